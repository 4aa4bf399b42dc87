/// File name that tells the reader not to write the content to disk.
pub const CONSOLE_FILE_NAME: &str = "_CONSOLE";

/// Metadata carried, encrypted, in the literal data packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHints {
    /// The content is binary rather than text.
    pub is_binary: bool,
    /// Suggested output file name. Truncated to 255 bytes when written; empty
    /// means the content should not be written to a file.
    pub file_name: String,
    /// Modification time, or 0 if not applicable.
    pub epoch_seconds: u32,
}

impl FileHints {
    pub fn binary(file_name: impl Into<String>) -> Self {
        Self {
            is_binary: true,
            file_name: file_name.into(),
            epoch_seconds: 0,
        }
    }

    pub fn text(file_name: impl Into<String>) -> Self {
        Self {
            is_binary: false,
            file_name: file_name.into(),
            epoch_seconds: 0,
        }
    }

    /// Hints for content meant only for display.
    pub fn for_console(is_binary: bool) -> Self {
        Self {
            is_binary,
            file_name: CONSOLE_FILE_NAME.to_string(),
            epoch_seconds: 0,
        }
    }

    pub fn with_epoch_seconds(mut self, epoch_seconds: u32) -> Self {
        self.epoch_seconds = epoch_seconds;
        self
    }

    pub fn is_for_console(&self) -> bool {
        self.file_name == CONSOLE_FILE_NAME
    }
}
