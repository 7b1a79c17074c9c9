//! Tenor LSP server: publishes description diagnostics on open and save,
//! and offers the fixed description as a quick fix.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tenor::config::DEFAULT_TEST_PATTERNS;
use tenor::parser::LineIndex;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

#[derive(Debug)]
struct Backend {
    client: Client,
    root_uri: RwLock<Option<Url>>,
}

fn severity_to_lsp(s: tenor::Severity) -> DiagnosticSeverity {
    match s {
        tenor::Severity::Error => DiagnosticSeverity::ERROR,
        tenor::Severity::Warning => DiagnosticSeverity::WARNING,
        tenor::Severity::Info => DiagnosticSeverity::HINT,
    }
}

/// Range from crate locations (1-indexed, byte columns); used when the text is unavailable
fn location_to_range(location: &tenor::Location) -> Range {
    let end_line = location.end_line.unwrap_or(location.line);
    let end_col = location.end_column.unwrap_or(location.column);
    Range::new(
        Position::new(
            location.line.saturating_sub(1) as u32,
            location.column.saturating_sub(1) as u32,
        ),
        Position::new(end_line.saturating_sub(1) as u32, end_col.saturating_sub(1) as u32),
    )
}

/// Linted document text, for turning byte spans into UTF-16 LSP ranges
struct Document<'a> {
    source: &'a str,
    index: LineIndex,
}

impl<'a> Document<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            index: LineIndex::new(source),
        }
    }

    fn position(&self, offset: usize) -> Position {
        let (line, character) = self.index.utf16_position(self.source, offset);
        Position::new(line as u32, character as u32)
    }

    fn range(&self, span: tenor::Span) -> Range {
        Range::new(self.position(span.start), self.position(span.end))
    }
}

/// Diagnostic for one issue; a fixable issue carries its text edit in `data`
fn issue_to_diagnostic(issue: &tenor::Issue, document: Option<&Document<'_>>) -> Diagnostic {
    let range = match document {
        Some(document) => document.range(issue.span),
        None => location_to_range(&issue.location),
    };
    let data = issue.fix.as_ref().zip(document).and_then(|(fix, document)| {
        let edit = TextEdit::new(document.range(fix.range), fix.final_replacement.clone());
        serde_json::to_value(edit).ok()
    });

    Diagnostic {
        range,
        severity: Some(severity_to_lsp(issue.severity)),
        code: Some(NumberOrString::String(issue.kind.to_string())),
        code_description: None,
        source: Some("tenor".to_string()),
        message: issue.message.clone(),
        related_information: None,
        tags: None,
        data,
    }
}

fn is_test_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    DEFAULT_TEST_PATTERNS.iter().any(|p| name.ends_with(p))
}

impl Backend {
    fn work_dir(&self, path: &Path) -> PathBuf {
        let fallback = || path.parent().unwrap_or(path).to_path_buf();
        match self.root_uri.read() {
            Ok(guard) => guard
                .as_ref()
                .and_then(|u| u.to_file_path().ok())
                .unwrap_or_else(fallback),
            Err(_) => fallback(),
        }
    }

    async fn lint_and_publish(&self, uri: Url) {
        let path = match uri.to_file_path() {
            Ok(p) => p,
            Err(_) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Could not resolve file path for {}", uri),
                    )
                    .await;
                return;
            }
        };

        if !is_test_file(&path) {
            return;
        }

        let work_dir = self.work_dir(&path);
        match tenor::lint_file(&path, &work_dir, None) {
            Ok(report) => {
                let source = std::fs::read_to_string(&path).ok();
                let document = source.as_deref().map(Document::new);
                let diagnostics: Vec<Diagnostic> = report
                    .issues
                    .iter()
                    .map(|issue| issue_to_diagnostic(issue, document.as_ref()))
                    .collect();
                tracing::debug!(file = %path.display(), diagnostics = diagnostics.len(), "publishing");
                self.client.publish_diagnostics(uri, diagnostics, None).await;
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("Tenor lint failed: {:#}", e))
                    .await;
                self.client.publish_diagnostics(uri, vec![], None).await;
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        if let Some(ref uri) = params.root_uri {
            if let Ok(mut guard) = self.root_uri.write() {
                *guard = Some(uri.clone());
            }
        }
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::NONE),
                        save: Some(SaveOptions::default().into()),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "tenor-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Tenor LSP initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.lint_and_publish(params.text_document.uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.lint_and_publish(params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let actions: Vec<CodeActionOrCommand> = params
            .context
            .diagnostics
            .into_iter()
            .filter(|d| d.source.as_deref() == Some("tenor"))
            .filter_map(|diagnostic| {
                let edit: TextEdit = serde_json::from_value(diagnostic.data.clone()?).ok()?;
                let title = format!("Rewrite as {}", edit.new_text);
                let changes = HashMap::from([(uri.clone(), vec![edit])]);
                Some(CodeActionOrCommand::CodeAction(CodeAction {
                    title,
                    kind: Some(CodeActionKind::QUICKFIX),
                    diagnostics: Some(vec![diagnostic]),
                    edit: Some(WorkspaceEdit {
                        changes: Some(changes),
                        ..Default::default()
                    }),
                    is_preferred: Some(true),
                    ..Default::default()
                }))
            })
            .collect();
        Ok(Some(actions))
    }
}

#[tokio::main]
async fn main() {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TENOR_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend {
        client,
        root_uri: RwLock::new(None),
    });
    Server::new(stdin, stdout, socket).serve(service).await;
}
