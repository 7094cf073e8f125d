use std::path::PathBuf;

use flowplan_core::error::FlowplanError;
use flowplan_core::ingest;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), FlowplanError> {
    let bytes = std::fs::read(&input_file)?;
    let name = input_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sheet = ingest::decode_file(&name, &bytes)?;

    match output_file {
        Some(path) => {
            let json = serde_json::to_string_pretty(&sheet)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Decoded {} row(s), written to {}",
                sheet.rows.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => println!("{}", serde_json::to_string_pretty(&sheet)?),
            _ => output::table::print_sheet(&name, &sheet),
        },
    }

    Ok(())
}
