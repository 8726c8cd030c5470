//! Line-oriented secret key files: one decimal scalar per line.

use std::io::{BufRead, Write};

use num_bigint::BigUint;

use super::SecKey;
use crate::errors::Error;

impl SecKey {
    pub fn write_lines<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        for key in &self.keys {
            writeln!(writer, "{key}")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_lines(&self) -> String {
        self.keys.iter().map(|key| format!("{key}\n")).collect()
    }

    /// Reads scalars until end of input; blank lines are skipped. `prob`
    /// is set to the number of scalars read.
    pub fn read_lines<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut keys = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.parse::<BigUint>().map_err(|err| Error::KeyFile {
                line: index + 1,
                reason: format!("{trimmed:?}: {err}"),
            })?;
            keys.push(key);
        }

        let prob = u32::try_from(keys.len()).map_err(|_| Error::KeyFile {
            line: keys.len(),
            reason: "too many keys".to_owned(),
        })?;

        Ok(SecKey::new(keys, prob))
    }
}
