//! Positional field access for decoders.
//!
//! Fields beyond the end of a short record read as `None`. Empty fields also
//! read as `None`. A numeric field that is present but unparseable reads as
//! `None` and leaves an issue behind for the caller to report.

/// A field that was present but could not be coerced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// Bounds-checked reader over one record's raw fields
#[derive(Debug)]
pub struct FieldReader<'a> {
    fields: &'a [String],
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a [String]) -> Self {
        Self {
            fields,
            issues: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw field, whitespace-trimmed, or `None` if absent or blank
    pub fn raw(&self, index: usize) -> Option<&'a str> {
        self.fields
            .get(index)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn text(&self, index: usize) -> Option<String> {
        self.raw(index).map(str::to_string)
    }

    /// Everything from `index` on, rejoined with commas
    pub fn rest(&self, index: usize) -> Option<String> {
        self.fields
            .get(index..)
            .filter(|rest| !rest.is_empty())
            .map(|rest| rest.join(","))
    }

    /// Base-10 integer; non-numeric text is recorded as an issue
    pub fn integer(&mut self, index: usize, field: &'static str) -> Option<i64> {
        let value = self.raw(index)?;
        match value.parse::<i64>() {
            Ok(number) => Some(number),
            Err(e) => {
                self.issue(field, value, format!("not a base-10 integer ({})", e));
                None
            }
        }
    }

    /// Integer mapped through a closed vocabulary; out-of-vocabulary is an issue
    pub fn coded<T>(
        &mut self,
        index: usize,
        field: &'static str,
        from_code: impl Fn(i64) -> Option<T>,
    ) -> Option<T> {
        let code = self.integer(index, field)?;
        let value = from_code(code);
        if value.is_none() {
            let raw = self.raw(index).unwrap_or_default();
            self.issue(field, raw, format!("code {} is outside the vocabulary", code));
        }
        value
    }

    pub fn issue(&mut self, field: &'static str, value: &str, reason: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            value: value.to_string(),
            reason: reason.into(),
        });
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }
}
