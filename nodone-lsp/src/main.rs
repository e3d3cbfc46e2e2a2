//! nodone LSP server: publishes done-callback diagnostics and offers the
//! promise rewrite as a quick fix.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

/// An open document and its latest lint result
#[derive(Debug)]
struct Document {
    text: String,
    report: Option<nodone::FileReport>,
}

#[derive(Debug)]
struct Backend {
    client: Client,
    root_uri: RwLock<Option<Url>>,
    documents: RwLock<HashMap<Url, Document>>,
}

fn nodone_severity_to_lsp(s: nodone::Severity) -> DiagnosticSeverity {
    match s {
        nodone::Severity::Error => DiagnosticSeverity::ERROR,
        nodone::Severity::Warning => DiagnosticSeverity::WARNING,
        nodone::Severity::Info => DiagnosticSeverity::HINT,
    }
}

/// LSP position (UTF-16 code units) of a byte offset
fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character: usize = before[line_start..].chars().map(char::len_utf16).sum();
    Position::new(line as u32, character as u32)
}

fn span_to_range(text: &str, span: nodone::Span) -> Range {
    Range::new(
        offset_to_position(text, span.start),
        offset_to_position(text, span.end),
    )
}

fn to_lsp_diagnostic(text: &str, d: &nodone::Diagnostic) -> Diagnostic {
    Diagnostic {
        range: span_to_range(text, d.span),
        severity: Some(nodone_severity_to_lsp(d.severity)),
        code: Some(NumberOrString::String(d.rule.to_string())),
        code_description: None,
        source: Some("nodone".to_string()),
        message: d.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

fn ranges_overlap(a: &Range, b: &Range) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Quick fixes for every diagnostic overlapping `range`
fn code_actions(uri: &Url, doc: &Document, range: &Range) -> Vec<CodeActionOrCommand> {
    let Some(report) = doc.report.as_ref() else {
        return Vec::new();
    };
    let mut actions = Vec::new();
    for d in &report.diagnostics {
        let diagnostic = to_lsp_diagnostic(&doc.text, d);
        if !ranges_overlap(&diagnostic.range, range) {
            continue;
        }
        for suggestion in &d.suggestions {
            let edits: Vec<TextEdit> = suggestion
                .edits
                .sorted()
                .into_iter()
                .map(|e| TextEdit::new(span_to_range(&doc.text, e.span), e.text.clone()))
                .collect();
            let mut changes = HashMap::new();
            changes.insert(uri.clone(), edits);
            actions.push(CodeActionOrCommand::CodeAction(CodeAction {
                title: suggestion.message.clone(),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![diagnostic.clone()]),
                edit: Some(WorkspaceEdit::new(changes)),
                is_preferred: Some(true),
                ..Default::default()
            }));
        }
    }
    actions
}

/// Lint `text` under the project config; `None` when the config's test
/// patterns do not cover `path`
fn lint_document(
    work_dir: &Path,
    path: &Path,
    text: &str,
) -> anyhow::Result<Option<nodone::FileReport>> {
    let config = nodone::config::load_config(work_dir, None)?;
    if !is_test_path(&config, path) {
        return Ok(None);
    }
    let linter = nodone::analyzer::Linter::new(&config);
    linter.lint_source(path, text).map(Some)
}

fn is_test_path(config: &nodone::config::Config, path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    config
        .get_test_patterns()
        .iter()
        .any(|p| name.ends_with(p))
}

impl Backend {
    fn work_dir_for(&self, path: &Path) -> PathBuf {
        let fallback = || path.parent().unwrap_or(path).to_path_buf();
        match self.root_uri.read() {
            Ok(guard) => guard
                .as_ref()
                .and_then(|u| u.to_file_path().ok())
                .unwrap_or_else(fallback),
            Err(_) => fallback(),
        }
    }

    /// Lint the stored text of `uri` and publish the result
    async fn refresh(&self, uri: Url) {
        let Ok(path) = uri.to_file_path() else {
            self.client
                .log_message(
                    MessageType::WARNING,
                    format!("Could not resolve file path for {}", uri),
                )
                .await;
            return;
        };
        let text = match self.documents.read() {
            Ok(docs) => docs.get(&uri).map(|d| d.text.clone()),
            Err(_) => None,
        };
        let Some(text) = text else {
            return;
        };

        let work_dir = self.work_dir_for(&path);
        match lint_document(&work_dir, &path, &text) {
            Ok(None) => {}
            Ok(Some(report)) => {
                tracing::debug!(uri = %uri, diagnostics = report.diagnostics.len(), "published");
                let diagnostics = report
                    .diagnostics
                    .iter()
                    .map(|d| to_lsp_diagnostic(&text, d))
                    .collect();
                if let Ok(mut docs) = self.documents.write() {
                    if let Some(doc) = docs.get_mut(&uri) {
                        doc.report = Some(report);
                    }
                }
                self.client.publish_diagnostics(uri, diagnostics, None).await;
            }
            Err(e) => {
                tracing::warn!(uri = %uri, error = %format!("{:#}", e), "lint failed");
                self.client
                    .log_message(MessageType::ERROR, format!("nodone failed: {:#}", e))
                    .await;
                self.client.publish_diagnostics(uri, vec![], None).await;
            }
        }
    }

    fn store(&self, uri: &Url, text: String) {
        if let Ok(mut docs) = self.documents.write() {
            docs.insert(uri.clone(), Document { text, report: None });
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
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(
                            SaveOptions {
                                include_text: Some(true),
                            }
                            .into(),
                        ),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "nodone-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "nodone LSP initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.store(&uri, params.text_document.text);
        self.refresh(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the last change carries the whole document
        if let Some(change) = params.content_changes.into_iter().last() {
            self.store(&uri, change.text);
            self.refresh(uri).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(text) = params.text {
            self.store(&uri, text);
        }
        self.refresh(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Ok(mut docs) = self.documents.write() {
            docs.remove(&params.text_document.uri);
        }
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let actions = match self.documents.read() {
            Ok(docs) => docs
                .get(&uri)
                .map(|doc| code_actions(&uri, doc, &params.range))
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        Ok(if actions.is_empty() { None } else { Some(actions) })
    }
}

#[tokio::main]
async fn main() {
    use tracing_subscriber::EnvFilter;

    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend {
        client,
        root_uri: RwLock::new(None),
        documents: RwLock::new(HashMap::new()),
    });
    Server::new(stdin, stdout, socket).serve(service).await;
}
