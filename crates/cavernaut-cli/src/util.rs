use std::{
    fs::File,
    io::{self, Write as _},
    path::Path,
};

use anyhow::Context;

use crate::schema::policy_model::PolicyModel;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

pub fn write_json_file<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", file_kind, path.display()))?;

    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {} JSON to {}", file_kind, path.display()))?;
    writeln!(&mut writer)
        .with_context(|| format!("Failed to write newline after JSON to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {} file: {}", file_kind, path.display()))?;

    Ok(())
}

/// Read a trained autopilot model from a JSON file
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed
pub fn read_policy_model_file<P>(path: P) -> anyhow::Result<PolicyModel>
where
    P: AsRef<Path>,
{
    read_json_file("policy model", path)
}

/// Write a trained autopilot model to a JSON file
///
/// # Errors
///
/// Returns error if file cannot be created or written
pub fn write_policy_model_file<P>(path: P, model: &PolicyModel) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    write_json_file("policy model", path, model)
}
