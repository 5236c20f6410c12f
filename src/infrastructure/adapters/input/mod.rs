pub mod lexicon_nlp_adapter;
