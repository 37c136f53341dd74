//! MCP Server for bookshelf-mcp
//!
//! MCP Protocol (stdio) <-> application::CatalogService / CatalogReport
//!
//! 5 tools: book_add, book_remove, book_search, book_list, book_stats

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::action::{CatalogAction, RemoveSelector};
use crate::application::error::AppError;
use crate::application::report::{CatalogReport, ReportFormat};
use crate::application::service::CatalogService;
use crate::domain::model::book::AddBookRequest;
use crate::domain::model::library::SearchMode;
use crate::infra::delimited_store::DelimitedLibraryRepository;

type FileCatalog = CatalogService<DelimitedLibraryRepository>;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。Libraryはここで一度だけ読み込まれ、セッション終了まで保持される。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let catalog = CatalogService::open(DelimitedLibraryRepository::new(&library_path))?;
    tracing::info!(path = %library_path.display(), "serving library over stdio");

    let server = BookshelfMcpServer::new(catalog);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct BookshelfMcpServer {
    catalog: Arc<Mutex<FileCatalog>>,
    tool_router: ToolRouter<Self>,
}

impl BookshelfMcpServer {
    fn new(catalog: FileCatalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            tool_router: Self::tool_router(),
        }
    }

    /// ロック中のCatalogに対して処理を行う。1回のtool呼び出しは完了まで排他的に実行される。
    fn with_catalog<T>(
        &self,
        f: impl FnOnce(&mut FileCatalog) -> Result<T, McpError>,
    ) -> Result<T, McpError> {
        let mut guard = self
            .catalog
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))?;
        f(&mut *guard)
    }

    /// 操作を実行して結果をレンダリングする。
    fn run_action(
        catalog: &mut FileCatalog,
        action: CatalogAction,
        format: ReportFormat,
    ) -> Result<CallToolResult, McpError> {
        let outcome = catalog.execute(action).map_err(Self::to_mcp_error)?;
        let text = CatalogReport::render(&outcome, format, true).map_err(Self::to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    fn to_mcp_error(e: AppError) -> McpError {
        if e.is_invalid_input() {
            McpError::invalid_params(format!("{e}"), None)
        } else {
            McpError::internal_error(format!("{e}"), None)
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for BookshelfMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bookshelf-mcp".to_string(),
                title: Some("Bookshelf MCP: Personal Library Manager".to_string()),
                description: Some(
                    "Personal book catalog stored in a plain `|`-delimited text file."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal library of books.\n\
                 \n\
                 Tools: `book_add`, `book_list` → `book_remove`, `book_search`, `book_stats`. \
                 Listings show a short ID in brackets; pass it (or 'Title by Author') to `book_remove`."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_format(format: Option<&str>) -> Result<ReportFormat, McpError> {
    match format {
        Some("markdown") | None => Ok(ReportFormat::Markdown),
        Some("json") => Ok(ReportFormat::Json),
        Some(other) => Err(McpError::invalid_params(
            format!("Unknown format: '{other}'. Use: markdown, json"),
            None,
        )),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookAddRequest {
    #[schemars(description = "Book title (required)")]
    pub title: String,
    #[schemars(description = "Author name (required)")]
    pub author: String,
    #[schemars(description = "Publication year, 0-9999")]
    pub year: u32,
    #[schemars(description = "Genre (optional, free text)")]
    pub genre: Option<String>,
    #[schemars(description = "Whether the book has been read (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookRemoveRequest {
    #[schemars(
        description = "Book to remove: short ID from `book_list` output (e.g. '3f2a9c1d'), full ID, or 'Title by Author'. With duplicate titles, 'Title by Author' removes the first match only."
    )]
    pub book: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookSearchRequest {
    #[schemars(description = "Search mode: 'by Title' or 'by Author' (also 'title', 'author', '1', '2')")]
    pub mode: String,
    #[schemars(description = "Case-insensitive substring to look for")]
    pub query: String,
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpReportRequest {
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub format: Option<String>,
}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl BookshelfMcpServer {
    #[tool(
        name = "book_add",
        description = "Add a book to the end of the library. Title and author are required; year must be 0-9999.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_add(
        &self,
        Parameters(req): Parameters<McpBookAddRequest>,
    ) -> Result<CallToolResult, McpError> {
        let action = CatalogAction::Add(AddBookRequest {
            title: req.title,
            author: req.author,
            year: req.year,
            genre: req.genre.unwrap_or_default(),
            read: req.read,
        });
        self.with_catalog(|catalog| Self::run_action(catalog, action, ReportFormat::Markdown))
    }

    #[tool(
        name = "book_remove",
        description = "Remove one book. Specify it by the short ID shown in `book_list` / `book_search`, or by 'Title by Author'. Nothing happens if no book matches.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_remove(
        &self,
        Parameters(req): Parameters<McpBookRemoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.with_catalog(|catalog| {
            let selector =
                RemoveSelector::resolve(&req.book, catalog.library()).map_err(Self::to_mcp_error)?;
            Self::run_action(catalog, CatalogAction::Remove(selector), ReportFormat::Markdown)
        })
    }

    #[tool(
        name = "book_search",
        description = "Search books by title or author (case-insensitive substring). Library is NOT modified.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_search(
        &self,
        Parameters(req): Parameters<McpBookSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let format = parse_format(req.format.as_deref())?;
        let mode = match req.mode.parse::<SearchMode>() {
            Ok(mode) => mode,
            // 未知のモードは検索せず案内文を返す
            Err(e) => return Ok(CallToolResult::success(vec![Content::text(e.to_string())])),
        };
        let action = CatalogAction::Search {
            mode,
            query: req.query,
        };
        self.with_catalog(|catalog| Self::run_action(catalog, action, format))
    }

    #[tool(
        name = "book_list",
        description = "List all books, split into read and unread. Each book shows a short ID usable with `book_remove`.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_list(
        &self,
        Parameters(req): Parameters<McpReportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let format = parse_format(req.format.as_deref())?;
        self.with_catalog(|catalog| Self::run_action(catalog, CatalogAction::ListAll, format))
    }

    #[tool(
        name = "book_stats",
        description = "Show total books, books read and percentage read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_stats(
        &self,
        Parameters(req): Parameters<McpReportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let format = parse_format(req.format.as_deref())?;
        self.with_catalog(|catalog| Self::run_action(catalog, CatalogAction::Stats, format))
    }
}

// =============================================================================
// Tests
// =============================================================================
