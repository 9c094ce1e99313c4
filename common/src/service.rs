//! # Service Model
//!
//! * [`descriptor`]: The JSON shapes exchanged with callers ([`descriptor::ServiceDescriptor`],
//!   [`descriptor::DesiredService`]) and the [`descriptor::Credentials`] pair.
//! * [`translate`]: Conversions between caller vocabulary and the directory's integer codes.
//! * [`directory`]: The port through which the engine reaches the OS service database.

pub mod descriptor;
pub mod directory;
pub mod translate;
