use std::io::Write;

use winsvc_core::schema::service_schema;

use crate::terminal::print;

pub fn schema(out: &mut dyn Write) -> anyhow::Result<()> {
    print::json(out, &service_schema())
}
