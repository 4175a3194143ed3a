//! CSV export of a projected list.

use std::io::Write;

use litrack_domain::{EntryField, LiteratureEntry};

use crate::error::ExportError;

/// Write entries as CSV, one column per field, headed by the stored names.
pub fn write_csv<'a, W, I>(writer: W, entries: I) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LiteratureEntry>,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EntryField::ALL.iter().map(EntryField::name))?;
    for entry in entries {
        out.write_record(EntryField::ALL.iter().map(|f| entry.field_text(*f).into_owned()))?;
    }
    out.flush()?;
    Ok(())
}

/// Render entries as a CSV string.
pub fn to_csv_string<'a, I>(entries: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a LiteratureEntry>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, entries)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
