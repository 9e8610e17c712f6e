use macros::traceable;

traceable! {
    RemoteStoreError {
        #[error("Object store rejected {key}: {err}")]
        PutRejected { key: String } => tracing::Level::ERROR,
    }
}
