pub mod document_store_port;
