pub mod doc;
pub mod pdf;
pub mod txt;

pub use doc::DocFile;
pub use pdf::PdfFile;
pub use txt::TxtFile;
