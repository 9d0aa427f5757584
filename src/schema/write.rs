// src/schema/write.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use super::Column;

/// Write the declared column list for `table_name` as pretty-printed JSON,
/// for the destination and lineage tooling to pick up.
///
/// - `table_name`: logical name, used to form `<table_name>_columns.json`
/// - `dir`: directory the JSON file lands in
///
/// The file is written atomically: to a tmp file, then renamed over the
/// original.
pub fn write_columns<P: AsRef<Path>>(table_name: &str, dir: P, cols: &[Column]) -> Result<()> {
    let dir = dir.as_ref();
    let file_name = format!("{}_columns.json", table_name);
    let path: PathBuf = dir.join(&file_name);

    let tmp_path = dir.join(format!(".{}_columns.json.tmp", table_name));
    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;

    serde_json::to_writer_pretty(&mut tmp, cols)
        .with_context(|| format!("serializing columns for {}", table_name))?;
    tmp.write_all(b"\n")?;

    fs::rename(&tmp_path, &path).with_context(|| {
        format!("renaming {} -> {}", tmp_path.display(), path.display())
    })?;

    Ok(())
}
