//! End-to-end scenarios running the whole physics pipeline
