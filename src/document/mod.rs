pub mod extract;
pub mod intake;

pub use extract::{DocumentExtractor, DocxExtractor, PlainTextExtractor, TextExtractor};
pub use intake::{assemble_text, check_upload, extension_allowed};
