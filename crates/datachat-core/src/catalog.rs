//! User-visible notices.
//!
//! Every fixed string the controller can append to the transcript lives here,
//! keyed by kind. Control logic refers to a `Notice`, never to a literal.

/// Kinds of fixed bot notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Selected file is larger than the upload limit.
    FileTooLarge,
    /// Upload requested with nothing attached.
    NoFileSelected,
    /// Upload finished with a 2xx response.
    UploadSucceeded,
    /// Upload failed and the backend gave no usable body.
    UploadFailed,
    /// Upload requested while another upload is still running.
    UploadInProgress,
    /// Query was empty or whitespace-only.
    EmptyQuery,
    /// Query sent while another query is still running.
    QueryInProgress,
    /// Chat response carried neither `answer` nor `error`.
    NoValidResponse,
    /// Chat call failed with nothing more specific to show.
    SomethingWentWrong,
    /// A path given for attachment could not be inspected.
    FileUnreadable,
}

impl Notice {
    /// Returns the display text for this notice.
    pub fn text(self) -> &'static str {
        match self {
            Notice::FileTooLarge => "File size exceeds the 10MB limit.",
            Notice::NoFileSelected => "Please select a file before uploading.",
            Notice::UploadSucceeded => "File uploaded successfully!",
            Notice::UploadFailed => "Failed to upload the file.",
            Notice::UploadInProgress => "An upload is already in progress.",
            Notice::EmptyQuery => "Please enter a query.",
            Notice::QueryInProgress => "Please wait for the previous answer.",
            Notice::NoValidResponse => "No valid response from the server.",
            Notice::SomethingWentWrong => "Ada Sesuatu Yang Salah. Mohon Coba Lagi.",
            Notice::FileUnreadable => "Could not read the selected file.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_texts_match_wire_strings() {
        assert_eq!(Notice::FileTooLarge.text(), "File size exceeds the 10MB limit.");
        assert_eq!(
            Notice::NoFileSelected.text(),
            "Please select a file before uploading."
        );
        assert_eq!(Notice::UploadSucceeded.text(), "File uploaded successfully!");
        assert_eq!(
            Notice::SomethingWentWrong.to_string(),
            "Ada Sesuatu Yang Salah. Mohon Coba Lagi."
        );
    }
}
