//! LSP capability negotiation.

use tower_lsp::lsp_types::{
    CompletionOptions, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions, TextDocumentSyncSaveOptions,
};

/// Get the server capabilities to report to the client.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                // camelot reads the file from disk, so the buffer text itself is unused
                change: Some(TextDocumentSyncKind::FULL),
                will_save: None,
                will_save_wait_until: None,
                save: Some(TextDocumentSyncSaveOptions::Supported(true)),
            },
        )),

        // Answered with an empty list.
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(false),
            ..Default::default()
        }),

        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_include_document_sync() {
        let caps = server_capabilities();
        let Some(TextDocumentSyncCapability::Options(options)) = caps.text_document_sync else {
            panic!("expected sync options");
        };
        assert_eq!(options.open_close, Some(true));
        assert_eq!(options.change, Some(TextDocumentSyncKind::FULL));
    }

    #[test]
    fn capabilities_include_save_notifications() {
        let caps = server_capabilities();
        let Some(TextDocumentSyncCapability::Options(options)) = caps.text_document_sync else {
            panic!("expected sync options");
        };
        assert_eq!(options.save, Some(TextDocumentSyncSaveOptions::Supported(true)));
    }

    #[test]
    fn capabilities_include_completion_stub() {
        assert!(server_capabilities().completion_provider.is_some());
    }
}
