//! Human-readable output: the settings header and one line per event.

use std::io::{self, Write};

use syncdir_core::SyncEvent;

use crate::command::{PROGRAM_NAME, ParsedArgs};

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Writes the settings in effect, one per line.
pub(crate) fn write_header<W: Write>(out: &mut W, parsed: &ParsedArgs) -> io::Result<()> {
    writeln!(out, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "   source:            {}", parsed.source.display())?;
    writeln!(out, "   target:            {}", parsed.target.display())?;
    writeln!(out, "   mode:              {}", parsed.mode().as_str())?;
    writeln!(out, "   watch:             {}", yes_no(parsed.watch))?;
    writeln!(out, "   skip initial sync: {}", yes_no(parsed.skip_initial_sync))?;
    writeln!(out, "   delete orphaned:   {}", yes_no(parsed.delete_orphaned))?;
    writeln!(out, "   preserve symlinks: {}", yes_no(parsed.symlink))?;
    writeln!(out, "   first level only:  {}", yes_no(parsed.nodeep))?;
    let excluded: Vec<&str> = parsed
        .excludes
        .iter()
        .chain(&parsed.exclude_globs)
        .map(String::as_str)
        .collect();
    if !excluded.is_empty() {
        writeln!(out, "   exclude:           {}", excluded.join(", "))?;
    }
    if !parsed.force_sync.is_empty() {
        writeln!(out, "   force sync:        {}", parsed.force_sync.join(", "))?;
    }
    writeln!(out)
}

/// Writes `event` as `<kind>: <relative path>`.
pub(crate) fn write_event<W: Write>(out: &mut W, event: &SyncEvent) -> io::Result<()> {
    writeln!(out, "{event}")
}
