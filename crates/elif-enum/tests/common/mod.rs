//! In-memory enum catalog connection for integration tests
//!
//! Interprets the enum DDL statements the manager emits with PostgreSQL
//! semantics. Several sessions can share one catalog to model separate
//! database connections.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use elif_enum::{EnumConnection, EnumRow};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Literal(String),
}

fn tokenize(sql: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                let mut literal = String::new();
                while let Some(c) = chars.next() {
                    if c == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                        } else {
                            break;
                        }
                    } else {
                        literal.push(c);
                    }
                }
                tokens.push(Token::Literal(literal));
            }
            c if c.is_whitespace() || c == '(' || c == ')' || c == ',' => {}
            c => {
                let mut word = c.to_string();
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || next == '(' || next == ')' || next == ',' {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    tokens
}

fn error(message: impl Into<String>) -> sqlx::Error {
    sqlx::Error::Protocol(message.into())
}

type Catalog = BTreeMap<String, Vec<String>>;

const NAMEDATALEN: usize = 64;

/// Identifiers are silently truncated to NAMEDATALEN - 1 bytes
fn identifier(name: &str) -> &str {
    let mut end = name.len().min(NAMEDATALEN - 1);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn apply(catalog: &mut Catalog, sql: &str) -> Result<(), sqlx::Error> {
    use Token::{Literal, Word};

    let tokens = tokenize(sql);
    let words: Vec<&str> = tokens
        .iter()
        .map(|t| match t {
            Word(w) => w.as_str(),
            Literal(_) => "",
        })
        .collect();

    match words.as_slice() {
        ["CREATE", "TYPE", name, "AS", "ENUM", ..] => {
            let name = identifier(name);
            if catalog.contains_key(name) {
                return Err(error(format!("type \"{}\" already exists", name)));
            }
            let mut labels = Vec::new();
            for token in &tokens[5..] {
                match token {
                    Literal(label) if !labels.contains(label) => labels.push(label.clone()),
                    Literal(label) => {
                        return Err(error(format!("enum labels must be unique: {}", label)))
                    }
                    Word(w) => return Err(error(format!("syntax error at or near \"{}\"", w))),
                }
            }
            catalog.insert(name.to_string(), labels);
            Ok(())
        }
        ["ALTER", "TYPE", name, "RENAME", "TO", new_name] => {
            let (name, new_name) = (identifier(name), identifier(new_name));
            if catalog.contains_key(new_name) {
                return Err(error(format!("type \"{}\" already exists", new_name)));
            }
            let labels = catalog
                .remove(name)
                .ok_or_else(|| error(format!("type \"{}\" does not exist", name)))?;
            catalog.insert(new_name.to_string(), labels);
            Ok(())
        }
        ["DROP", "TYPE", name] => catalog
            .remove(identifier(name))
            .map(|_| ())
            .ok_or_else(|| error(format!("type \"{}\" does not exist", name))),
        ["ALTER", "TYPE", name, "ADD", "VALUE", ..] => {
            let name = identifier(name);
            let labels = catalog
                .get_mut(name)
                .ok_or_else(|| error(format!("type \"{}\" does not exist", name)))?;
            let (value, position) = match &tokens[5..] {
                [Literal(value)] => (value, None),
                [Literal(value), Word(side), Literal(anchor)] => (value, Some((side.as_str(), anchor))),
                _ => return Err(error(format!("syntax error in \"{}\"", sql))),
            };
            if labels.contains(value) {
                return Err(error(format!("enum label \"{}\" already exists", value)));
            }
            let index = match position {
                None => labels.len(),
                Some((side, anchor)) => {
                    let at = labels
                        .iter()
                        .position(|l| l == anchor)
                        .ok_or_else(|| error(format!("\"{}\" is not an existing enum label", anchor)))?;
                    match side {
                        "BEFORE" => at,
                        "AFTER" => at + 1,
                        other => return Err(error(format!("syntax error at or near \"{}\"", other))),
                    }
                }
            };
            labels.insert(index, value.clone());
            Ok(())
        }
        ["ALTER", "TYPE", name, "RENAME", "VALUE", "", "TO", ""] => {
            let name = identifier(name);
            let labels = catalog
                .get_mut(name)
                .ok_or_else(|| error(format!("type \"{}\" does not exist", name)))?;
            let (from, to) = match (&tokens[5], &tokens[7]) {
                (Literal(from), Literal(to)) => (from, to),
                _ => return Err(error(format!("syntax error in \"{}\"", sql))),
            };
            if labels.contains(to) {
                return Err(error(format!("enum label \"{}\" already exists", to)));
            }
            let slot = labels
                .iter_mut()
                .find(|l| l.as_str() == from.as_str())
                .ok_or_else(|| error(format!("\"{}\" is not an existing enum label", from)))?;
            *slot = to.clone();
            Ok(())
        }
        _ => Err(error(format!("unsupported statement: {}", sql))),
    }
}

/// One simulated session on a shared catalog
pub struct MockConnection {
    catalog: Arc<Mutex<Catalog>>,
    version: i64,
    executed: Vec<String>,
    catalog_queries: usize,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(Mutex::new(Catalog::new())),
            version: 150_004,
            executed: Vec::new(),
            catalog_queries: 0,
        }
    }

    /// Report an older server version
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Another session on the same catalog
    pub fn session(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            version: self.version,
            executed: Vec::new(),
            catalog_queries: 0,
        }
    }

    /// Seed a type directly, bypassing any manager
    pub fn seed(&self, name: &str, labels: &[&str]) {
        self.catalog
            .lock()
            .unwrap()
            .insert(name.to_string(), labels.iter().map(|l| l.to_string()).collect());
    }

    /// Labels of a type as stored in the simulated database
    pub fn stored(&self, name: &str) -> Option<Vec<String>> {
        self.catalog.lock().unwrap().get(name).cloned()
    }

    /// Statements executed through this session, including failed ones
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    /// How many times the catalog query ran on this session
    pub fn catalog_queries(&self) -> usize {
        self.catalog_queries
    }
}

#[async_trait]
impl EnumConnection for MockConnection {
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        self.executed.push(sql.to_string());
        let mut catalog = self.catalog.lock().unwrap();
        apply(&mut catalog, sql)
    }

    async fn fetch_enum_rows(&mut self, _sql: &str) -> Result<Vec<EnumRow>, sqlx::Error> {
        self.catalog_queries += 1;
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog
            .iter()
            .map(|(name, labels)| EnumRow {
                name: name.clone(),
                labels: labels.clone(),
            })
            .collect())
    }

    async fn server_version_num(&mut self) -> Result<i64, sqlx::Error> {
        Ok(self.version)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
