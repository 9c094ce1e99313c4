use std::io::Write;

use anyhow::Context;
use serde::Serialize;

/// Writes `value` as one compact JSON line.
pub fn json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string(value).context("failed to render result")?;
    writeln!(out, "{rendered}").context("failed to write result")?;
    out.flush().context("failed to flush result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_compact_single_line() {
        let mut out = Vec::new();
        json(&mut out, &json!({"name": "Spooler", "_exist": false})).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"name\":\"Spooler\",\"_exist\":false}\n"
        );
    }
}
