//! Game-boundary tracking.
//!
//! Event files hold many games back to back; every record belongs to the
//! game opened by the most recent `id` record. Stamping is a single forward
//! fold carrying the current game id.

use crate::constants::record_types;
use crate::decoders::identity::decode_game_identity;
use crate::error::OrphanRange;
use crate::models::RawRecord;

/// Stamp `game_id` on every record from the most recent `id` record.
///
/// The `id` record itself carries its own id. Records before the first `id`
/// keep `None`. Stamping depends only on the `id` records, so running this
/// again over already-stamped records gives the same result.
pub fn assign_game_ids(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records
        .into_iter()
        .scan(None::<String>, |current, mut record| {
            if record.record_type == record_types::ID {
                *current = decode_game_identity(&record.fields).game_id;
            }
            record.game_id = current.clone();
            Some(record)
        })
        .collect()
}

/// Contiguous runs of records without a game id, in line order.
pub fn orphan_ranges(records: &[RawRecord]) -> Vec<OrphanRange> {
    let mut ranges: Vec<OrphanRange> = Vec::new();
    let mut open = false;

    for record in records {
        if record.game_id.is_some() {
            open = false;
            continue;
        }
        if open {
            if let Some(range) = ranges.last_mut() {
                range.last_line = record.line_number;
                range.count += 1;
            }
        } else {
            ranges.push(OrphanRange {
                first_line: record.line_number,
                last_line: record.line_number,
                count: 1,
            });
            open = true;
        }
    }

    ranges
}
