pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search provider error: {message}")]
	Search { message: String },
	#[error("Fetch provider error: {message}")]
	Fetch { message: String },
	#[error("Summarizer provider error: {message}")]
	Summarizer { message: String },
}
