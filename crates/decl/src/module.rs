//! [`Module`]: one loaded Go package with its comment store, symbol table
//! and position index.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::check::{CheckOutput, Diagnostic, Import, ParsedFile, check_package};
use crate::comments::{CommentGroup, CommentStore, Comments};
use crate::config::LoadConfig;
use crate::error::DeclError;
use crate::index::PositionIndex;
use crate::parser::{AstTree, SourceFile, first_syntax_error, package_name, parse_source};
use crate::position::{FileId, Location, Pos};
use crate::syntax::offset;
use crate::types::{Symbol, SymbolId, SymbolTable, Type, TypeId, TypeTable, TypeWriter};

/// A loaded package. Built once, read-only afterwards.
#[derive(Debug)]
pub struct Module {
    package: String,
    files: Vec<SourceFile>,
    comments: CommentStore,
    index: PositionIndex,
    symbols: SymbolTable,
    types: TypeTable,
    imports: Vec<Import>,
    diagnostics: Vec<Diagnostic>,
    config: LoadConfig,
}

impl Module {
    /// Load the package at `path`: a directory of `.go` files or a single
    /// `.go` file.
    ///
    /// # Errors
    ///
    /// Any load failure: unreadable files, no Go files, more than one
    /// package name, a missing package clause, a syntax error, or with
    /// `strict` set, a type resolution diagnostic.
    pub fn load(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Self, DeclError> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            go_files(path, config.include_tests)?
        } else {
            vec![path.to_path_buf()]
        };
        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            let text = std::fs::read_to_string(&file).map_err(|source| DeclError::Io {
                path: file.clone(),
                source,
            })?;
            sources.push((file.display().to_string(), text));
        }
        Self::build(path, sources, config)
    }

    /// Build a module from already loaded `(file name, source)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Module::load`], minus I/O.
    pub fn load_sources<N, S>(sources: &[(N, S)], config: &LoadConfig) -> Result<Self, DeclError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let sources = sources
            .iter()
            .map(|(name, text)| (name.as_ref().to_string(), text.as_ref().to_string()))
            .collect();
        Self::build(Path::new("<sources>"), sources, config)
    }

    fn build(
        origin: &Path,
        sources: Vec<(String, String)>,
        config: &LoadConfig,
    ) -> Result<Self, DeclError> {
        if sources.is_empty() {
            return Err(DeclError::NoPackage {
                path: origin.to_path_buf(),
            });
        }
        let files: Vec<SourceFile> = sources
            .into_iter()
            .enumerate()
            .map(|(i, (name, text))| SourceFile::new(FileId::from_index(i), name, text))
            .collect();
        let trees: Vec<AstTree> = files.iter().map(|f| parse_source(f.text())).collect();

        let mut names: Vec<String> = Vec::new();
        for (file, tree) in files.iter().zip(&trees) {
            let root = tree.root();
            if let Some(error) = first_syntax_error(&root) {
                let loc = file.location(offset(&error));
                return Err(DeclError::Syntax {
                    file: loc.file,
                    line: loc.line,
                    column: loc.column,
                });
            }
            let name = package_name(&root).ok_or_else(|| DeclError::MissingPackageClause {
                file: file.name().to_string(),
            })?;
            if !names.contains(&name) {
                names.push(name);
            }
            debug!(file = file.name(), bytes = file.text().len(), "parsed");
        }
        if names.len() > 1 {
            return Err(DeclError::MultiplePackages {
                path: origin.to_path_buf(),
                names,
            });
        }
        let package = names.pop().unwrap_or_default();

        let mut comments = CommentStore::default();
        let parsed: Vec<ParsedFile<'_>> = files
            .iter()
            .zip(&trees)
            .map(|(file, tree)| ParsedFile {
                id: file.id(),
                root: tree.root(),
            })
            .collect();
        for file in &parsed {
            comments.record_file(file.id, &file.root);
        }
        let CheckOutput {
            mut symbols,
            types,
            imports,
            diagnostics,
        } = check_package(&parsed, config.mode);
        if config.sort_by_position {
            symbols.sort_by_position();
        }
        let index = PositionIndex::build(&symbols);

        let module = Self {
            package,
            files,
            comments,
            index,
            symbols,
            types,
            imports,
            diagnostics,
            config: config.clone(),
        };
        module.report_diagnostics()?;
        debug!(
            package = %module.package,
            files = module.files.len(),
            symbols = module.symbols.len(),
            definitions = module.index.len(),
            comments = module.comments.len(),
            "module built"
        );
        Ok(module)
    }

    fn report_diagnostics(&self) -> Result<(), DeclError> {
        for diagnostic in &self.diagnostics {
            let loc = self.display_pos(diagnostic.pos);
            warn!(location = %loc, "{}", diagnostic.message);
        }
        match self.diagnostics.first() {
            Some(first) if self.config.strict => Err(DeclError::TypeCheck {
                count: self.diagnostics.len(),
                first: format!("{}: {}", self.display_pos(first.pos), first.message),
            }),
            _ => Ok(()),
        }
    }

    fn display_pos(&self, pos: Pos) -> String {
        self.location(pos)
            .map_or_else(|| format!("{pos:?}"), |loc| loc.to_string())
    }

    // ── Accessors ─────────────────────────────────────────────────

    /// Package name from the package clauses.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    #[must_use]
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    #[must_use]
    pub const fn types(&self) -> &TypeTable {
        &self.types
    }

    #[must_use]
    pub fn ty(&self, id: TypeId) -> &Type {
        self.types.get(id)
    }

    #[must_use]
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Type resolution problems. Never fatal unless the load was strict.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub const fn config(&self) -> &LoadConfig {
        &self.config
    }

    #[must_use]
    pub const fn comment_store(&self) -> &CommentStore {
        &self.comments
    }

    #[must_use]
    pub const fn position_index(&self) -> &PositionIndex {
        &self.index
    }

    /// Package-level symbol named `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.lookup(name).and_then(|id| self.symbols.get(id))
    }

    /// Symbol defined at `pos`.
    #[must_use]
    pub fn symbol_at(&self, pos: Pos) -> Option<&Symbol> {
        self.index.get(pos).and_then(|id| self.symbols.get(id))
    }

    #[must_use]
    pub fn location(&self, pos: Pos) -> Option<Location> {
        self.file(pos.file()).map(|f| f.location(pos.offset()))
    }

    // ── Comments ──────────────────────────────────────────────────

    /// Recorded groups at `pos`, absent ones included.
    #[must_use]
    pub fn comments_raw(&self, pos: Pos) -> &[Option<CommentGroup>] {
        self.comments.raw(pos)
    }

    /// Comment lines of the definition at `pos`.
    ///
    /// Empty when nothing is defined there, nothing was recorded, or every
    /// recorded group is absent.
    #[must_use]
    pub fn comments_at(&self, pos: Pos) -> Comments {
        if !self.index.contains(pos) {
            return Comments::default();
        }
        Comments::from_groups(self.comments.raw(pos))
    }

    /// Comment lines of a symbol's declaration.
    #[must_use]
    pub fn comments(&self, id: SymbolId) -> Comments {
        self.symbols
            .get(id)
            .map_or_else(Comments::default, |s| self.comments_at(s.pos()))
    }

    // ── Types ─────────────────────────────────────────────────────

    /// Go syntax for a type, e.g. `map[string][]*Book`.
    #[must_use]
    pub fn type_string(&self, ty: TypeId) -> String {
        TypeWriter::new(&self.symbols, &self.types).type_string(ty)
    }

    /// One-line Go-like description of a symbol.
    #[must_use]
    pub fn describe(&self, id: SymbolId) -> String {
        TypeWriter::new(&self.symbols, &self.types).describe(id)
    }

    #[must_use]
    pub fn underlying(&self, ty: TypeId) -> TypeId {
        self.types.underlying(ty)
    }

    /// Name of a type: the type name of defined types and aliases, the
    /// element's name for pointers, the predeclared name for basic types.
    /// Empty for anything else.
    #[must_use]
    pub fn type_name(&self, ty: TypeId) -> &str {
        match self.types.get(ty) {
            Type::Named(named) => self.name_of(named.obj),
            Type::Alias { obj, .. } => self.name_of(*obj),
            Type::Instance { origin, .. } => self.type_name(*origin),
            Type::Pointer(elem) => self.type_name(*elem),
            Type::Basic(basic) => basic.name(),
            Type::External { name, .. } => name,
            _ => "",
        }
    }

    /// Package declaring a type. `None` for predeclared and unnamed types.
    #[must_use]
    pub fn type_package(&self, ty: TypeId) -> Option<&str> {
        match self.types.get(ty) {
            Type::Named(_) | Type::Alias { .. } => Some(&self.package),
            Type::Instance { origin, .. } => self.type_package(*origin),
            Type::Pointer(elem) => self.type_package(*elem),
            Type::External { package, .. } => Some(package),
            _ => None,
        }
    }

    fn name_of(&self, id: SymbolId) -> &str {
        self.symbols.get(id).map_or("", Symbol::name)
    }
}

/// `.go` files directly inside `dir`, sorted by name.
fn go_files(dir: &Path, include_tests: bool) -> Result<Vec<PathBuf>, DeclError> {
    let io_err = |source| DeclError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_go = path.extension().is_some_and(|ext| ext == "go");
        if !is_go || !path.is_file() || (!include_tests && name.ends_with("_test.go")) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    if files.is_empty() {
        return Err(DeclError::NoPackage {
            path: dir.to_path_buf(),
        });
    }
    debug!(dir = %dir.display(), files = files.len(), "found Go files");
    Ok(files)
}
