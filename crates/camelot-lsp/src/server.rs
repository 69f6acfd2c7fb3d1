//! LSP server implementation using tower-lsp.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use camelot_lsp_core::{
    AnalyzerCommand, AnalyzerConfig, CamelotSettings, ConfigProvider, OutputFormat,
    SETTINGS_SECTION,
};

use crate::capabilities::server_capabilities;
use crate::convert;
use crate::document::{Document, DocumentStore};
use crate::tasks::ValidationTasks;

/// Startup options for the server, usually taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Command used when the client sets no `camelot.path`.
    pub analyzer: Option<String>,
    /// Output mode requested from camelot.
    pub output_format: OutputFormat,
}

impl ServerOptions {
    /// The analyzer configuration these options start a session with.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        match &self.analyzer {
            Some(command) => AnalyzerConfig::with_fallback(AnalyzerCommand::new(command.clone())),
            None => AnalyzerConfig::default(),
        }
    }
}

/// The camelot language server.
pub struct CamelotLanguageServer {
    /// The LSP client for sending notifications.
    client: Client,
    /// Analyzer command resolution.
    config: Arc<ConfigProvider>,
    /// Output mode requested from camelot.
    output_format: OutputFormat,
    /// Documents currently open in the client.
    documents: Arc<RwLock<DocumentStore>>,
    /// In-flight validation cycles.
    tasks: Arc<ValidationTasks>,
    /// Whether the client answers `workspace/configuration`.
    supports_configuration: AtomicBool,
    /// Set once the user has been told the analyzer is missing.
    warned_missing_analyzer: AtomicBool,
}

impl CamelotLanguageServer {
    /// Create a new language server instance.
    pub fn new(client: Client, options: ServerOptions) -> Self {
        Self {
            client,
            config: Arc::new(ConfigProvider::new(options.analyzer_config())),
            output_format: options.output_format,
            documents: Arc::new(RwLock::new(DocumentStore::new())),
            tasks: Arc::new(ValidationTasks::new()),
            supports_configuration: AtomicBool::new(false),
            warned_missing_analyzer: AtomicBool::new(false),
        }
    }

    /// Fetch the `camelot` section from the client.
    ///
    /// Returns `None` if the request fails.
    async fn fetch_settings(&self) -> Option<CamelotSettings> {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(SETTINGS_SECTION.to_string()),
        }];

        match self.client.configuration(items).await {
            Ok(values) => Some(
                values
                    .into_iter()
                    .next()
                    .map(CamelotSettings::from_value)
                    .unwrap_or_default(),
            ),
            Err(error) => {
                tracing::warn!(%error, "failed to fetch camelot settings");
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Failed to fetch camelot settings: {}", error),
                    )
                    .await;
                None
            }
        }
    }

    /// Re-read settings from the client and apply them.
    async fn refresh_configuration(&self) {
        if !self.supports_configuration.load(Ordering::Relaxed) {
            return;
        }

        match self.fetch_settings().await {
            Some(settings) => self.config.apply(settings),
            None => self.config.clear_override(),
        }
        self.check_analyzer().await;
    }

    /// Tell the user, once per session, if the analyzer cannot be found.
    async fn check_analyzer(&self) {
        let command = self.config.resolve();
        let lookup = command.clone();
        // `which` walks PATH on disk.
        let located = tokio::task::spawn_blocking(move || lookup.locate()).await;
        if matches!(located, Ok(Some(_))) {
            return;
        }

        tracing::warn!(%command, "camelot not found");
        if !self.warned_missing_analyzer.swap(true, Ordering::Relaxed) {
            self.client
                .show_message(
                    MessageType::WARNING,
                    format!(
                        "camelot could not be found (`{}`). Set `camelot.path` to enable diagnostics.",
                        command
                    ),
                )
                .await;
        }
    }

    /// Start a validation cycle for `uri`, superseding any cycle in flight for it.
    ///
    /// Diagnostics are published against the document version current when
    /// the cycle starts.
    async fn schedule_validation(&self, uri: Url) {
        let version = self.documents.read().await.get(&uri).map(Document::version);
        let path = match uri.to_file_path() {
            Ok(path) => path,
            Err(()) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Cannot run camelot on non-file URI: {}", uri),
                    )
                    .await;
                self.client.publish_diagnostics(uri, Vec::new(), version).await;
                return;
            }
        };

        let command = self.config.resolve();
        let format = self.output_format;
        let client = self.client.clone();
        let tasks = Arc::clone(&self.tasks);
        let generation = self.tasks.begin(&uri);
        let task_uri = uri.clone();

        // Aborting this task drops the analyzer child, which kills it.
        let handle = tokio::spawn(async move {
            let report = camelot_lsp_core::validate(&command, format, &path).await;

            if !tasks.is_current(&task_uri, generation) {
                tracing::debug!(uri = %task_uri, generation, "dropping superseded diagnostics");
                return;
            }

            let diagnostics: Vec<Diagnostic> = report
                .diagnostics
                .iter()
                .map(|diag| convert::diagnostic_to_lsp(diag, &task_uri))
                .collect();

            tracing::debug!(uri = %task_uri, count = diagnostics.len(), "publishing diagnostics");
            client
                .publish_diagnostics(task_uri.clone(), diagnostics, version)
                .await;
            tasks.finish(&task_uri, generation);
        });

        self.tasks.attach(&uri, generation, handle.abort_handle());
    }

    /// Revalidate every open document.
    async fn revalidate_all(&self) {
        let uris = self.documents.read().await.uris();
        for uri in uris {
            self.schedule_validation(uri).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CamelotLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let supports_configuration = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|workspace| workspace.configuration)
            .unwrap_or(false);
        self.supports_configuration
            .store(supports_configuration, Ordering::Relaxed);

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "camelot-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "camelot LSP server initialized")
            .await;

        if self.supports_configuration.load(Ordering::Relaxed) {
            self.refresh_configuration().await;
            // Documents opened while the settings were in flight ran with the old command.
            self.revalidate_all().await;
        } else {
            self.check_analyzer().await;
        }
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if self.supports_configuration.load(Ordering::Relaxed) {
            self.refresh_configuration().await;
        } else {
            let section = params
                .settings
                .get(SETTINGS_SECTION)
                .cloned()
                .unwrap_or_default();
            self.config.apply(CamelotSettings::from_value(section));
            self.check_analyzer().await;
        }

        self.revalidate_all().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        {
            let mut documents = self.documents.write().await;
            documents.open(uri.clone(), version);
        }

        self.schedule_validation(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        {
            let mut documents = self.documents.write().await;
            documents.change(&uri, version);
        }

        self.schedule_validation(uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.schedule_validation(params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        {
            let mut documents = self.documents.write().await;
            documents.close(&uri);
        }
        self.tasks.cancel(&uri);

        // Clear diagnostics for closed document
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, _params: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(Some(CompletionResponse::Array(Vec::new())))
    }
}

/// Run the LSP server over stdio.
pub async fn run_server(options: ServerOptions) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| CamelotLanguageServer::new(client, options.clone()));
    Server::new(stdin, stdout, socket).serve(service).await;
}
