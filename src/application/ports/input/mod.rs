pub mod nlp_port;
