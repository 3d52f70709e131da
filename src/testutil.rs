/// In-memory providers for unit tests
use crate::error::ProviderError;
use crate::provider::{DirectoryProvider, SearchHit, SearchOutcome, SourceDataProvider};
use crate::types::{Cell, HeaderCell, RawTable};
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source provider backed by maps of canned searches and tables
#[derive(Default)]
pub struct MockSource {
    searches: HashMap<String, SearchOutcome>,
    tables: HashMap<String, RawTable>,
    failing_searches: HashSet<String>,
    failing_tables: HashSet<String>,
    search_calls: AtomicUsize,
    table_calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player whose search redirects straight to their page, with a
    /// Rk/Teammate/G table of the given (teammate, games) rows
    pub fn with_player(mut self, name: &str, key: &str, teammates: &[(&str, u32)]) -> Self {
        self.searches.insert(name.to_string(), SearchOutcome::Redirect(hit(name, key)));
        self.tables.insert(key.to_string(), games_table(teammates));
        self
    }

    /// A search answered with a result listing of (display name, key)
    pub fn with_listing(mut self, query: &str, hits: &[(&str, &str)]) -> Self {
        let listing = hits.iter().map(|(name, key)| hit(name, key)).collect();
        self.searches.insert(query.to_string(), SearchOutcome::Listing(listing));
        self
    }

    pub fn with_table(mut self, key: &str, table: RawTable) -> Self {
        self.tables.insert(key.to_string(), table);
        self
    }

    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn failing_table(mut self, key: &str) -> Self {
        self.failing_tables.insert(key.to_string());
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn table_calls(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }
}

impl SourceDataProvider for MockSource {
    fn search(&self, query: &str) -> Result<SearchOutcome, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_searches.contains(query) {
            return Err(ProviderError::Http { url: "mock://search".to_string(), message: "timed out".to_string() });
        }
        Ok(self.searches.get(query).cloned().unwrap_or_else(|| SearchOutcome::Listing(Vec::new())))
    }

    fn fetch_roster_table(&self, stable_key: &str, _display_name: &str) -> Result<Option<RawTable>, ProviderError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_tables.contains(stable_key) {
            return Err(ProviderError::Status { url: "mock://teammates".to_string(), code: 503 });
        }
        Ok(self.tables.get(stable_key).cloned())
    }
}

pub struct MockDirectory(pub Vec<String>);

impl DirectoryProvider for MockDirectory {
    fn list_known_names(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.0.clone())
    }
}

pub fn hit(name: &str, key: &str) -> SearchHit {
    let initial = key.chars().next().unwrap_or('x');
    SearchHit {
        display_name: name.to_string(),
        stable_key: key.to_string(),
        url: format!("https://example.test/players/{}/{}.html", initial, key),
    }
}

/// Rk / Teammate / G table
pub fn games_table(teammates: &[(&str, u32)]) -> RawTable {
    RawTable {
        headers: vec![HeaderCell::flat("Rk"), HeaderCell::flat("Teammate"), HeaderCell::flat("G")],
        rows: teammates
            .iter()
            .enumerate()
            .map(|(i, (name, games))| {
                vec![Cell::Number((i + 1) as f64), Cell::Text(name.to_string()), Cell::Number(f64::from(*games))]
            })
            .collect(),
    }
}

/// Answer a single HTTP request with a canned response; returns the server's base URL
pub fn serve_once(status: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local address");
    let response =
        format!("HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}", status, body.len(), body);

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let Ok(read_half) = stream.try_clone() else { return };
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            stream.write_all(response.as_bytes()).ok();
        }
    });

    format!("http://{}", addr)
}
