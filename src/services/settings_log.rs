//! Line written into the host's settings log.

use std::io::{self, Write};

/// Write `Settings Randomization Profile: <name>` followed by a blank line.
pub fn write_settings_log<W: Write + ?Sized>(writer: &mut W, profile_name: &str) -> io::Result<()> {
    writeln!(writer, "Settings Randomization Profile: {profile_name}")?;
    writeln!(writer)
}
