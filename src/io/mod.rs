pub mod cache;
pub mod excel_read;
pub mod excel_write;
pub mod rdf;
pub mod tsv;
