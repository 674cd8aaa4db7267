//! Persistenz-Codec: JSON-Wire-Format, Decoder/Encoder und HTML-Export.

pub mod decoder;
pub mod document;
pub mod encoder;
pub mod html_export;

pub use decoder::{decode_document, roadbook_from_document, DecodeReport};
pub use document::{RoadbookDocument, EXPORT_VERSION, LOCAL_SNAPSHOT_VERSION};
pub use encoder::{document_from_roadbook, encode_document, DocumentKind};
pub use html_export::{export_html, import_html};
