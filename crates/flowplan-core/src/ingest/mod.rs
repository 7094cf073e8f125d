pub mod delimited;
pub mod xlsx;

use std::path::Path;

use crate::error::FlowplanError;
use crate::model::DecodedSheet;

/// Decode an uploaded spreadsheet payload into rows.
///
/// Format is picked by file extension: `.csv` goes through the delimited
/// reader, everything else through the xlsx decoder. Decode failure leaves
/// the dataset unset at the caller; there is no partial result.
pub fn decode_file(name: &str, bytes: &[u8]) -> Result<DecodedSheet, FlowplanError> {
    let is_csv = Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        delimited::decode(bytes)
    } else {
        xlsx::decode(bytes)
    }
}
