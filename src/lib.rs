//! Personal book catalog backed by a `|`-delimited text file.
//!
//! - `domain`: BookRecord / Library and the repository abstraction
//! - `infra`: the delimited file store
//! - `application`: catalog operations, action dispatch and reports
//! - `interface`: MCP server over stdio

pub mod config;

pub mod domain {
    pub mod error;
    pub mod repository;

    pub mod model {
        pub mod book;
        pub mod id;
        pub mod library;
    }
}

pub mod infra {
    pub mod delimited_store;
}

pub mod application {
    pub mod action;
    pub mod error;
    pub mod report;
    pub mod service;
}

pub mod interface {
    pub mod mcp;
}
