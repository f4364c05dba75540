//! Game metadata (`info`), free-text comment (`com`) and earned-run
//! data (`data`) records.

use super::fields::FieldReader;
use serde::Serialize;

/// One key/value pair of game metadata, e.g. `info,visteam,BOS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRecord {
    pub info_type: Option<String>,
    pub info_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub text: Option<String>,
}

/// `data,er,player_id,runs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRecord {
    pub data_type: Option<String>,
    pub player_id: Option<String>,
    pub numeric_value: Option<i64>,
}

pub(super) fn read_info(reader: &mut FieldReader<'_>) -> InfoRecord {
    // Unquoted values that contain commas arrive split; put them back together.
    let info_value = reader
        .rest(1)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    InfoRecord {
        info_type: reader.text(0),
        info_value,
    }
}

pub(super) fn read_comment(reader: &mut FieldReader<'_>) -> CommentRecord {
    CommentRecord {
        text: reader.rest(0).filter(|text| !text.trim().is_empty()),
    }
}

pub(super) fn read_data(reader: &mut FieldReader<'_>) -> DataRecord {
    DataRecord {
        data_type: reader.text(0),
        player_id: reader.text(1),
        numeric_value: reader.integer(2, "numeric_value"),
    }
}
