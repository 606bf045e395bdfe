//! Fallback resolution for one compile run.
//!
//! `resolve(locale)` yields the translation of every message of the source
//! catalogue: the locale's own translation when present, otherwise the first
//! translation found along its fallback chain (configured fallbacks in order,
//! each expanded depth-first, then the source locale).
//!
//! Both catalogue loads and resolutions are cached per locale as shared
//! futures. Concurrent callers asking for the same locale await the same
//! in-flight work, so each catalogue file is read at most once per run.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use futures::future::{BoxFuture, FutureExt, Shared, try_join_all};

use super::{CatalogueEntry, CatalogueError, output_path, read_catalogue};
use crate::config::{CatalogueConfig, Config};
use crate::core::parsers::{CatalogueFormat, Format};

/// Resolved `id -> translation` map of one locale.
pub type Translations = Arc<BTreeMap<String, String>>;

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, Arc<CatalogueError>>>>;

/// Where catalogue entries of a locale come from.
pub trait CatalogueSource: Send + Sync + 'static {
    fn load(&self, locale: &str) -> BoxFuture<'static, Result<Vec<CatalogueEntry>, CatalogueError>>;
}

/// Catalogue files of one configured catalogue.
pub struct FileSource {
    root: PathBuf,
    template: String,
    format: Format,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>, catalogue: &CatalogueConfig) -> Self {
        Self {
            root: root.into(),
            template: catalogue.output.clone(),
            format: catalogue.format.into(),
        }
    }
}

impl CatalogueSource for FileSource {
    fn load(&self, locale: &str) -> BoxFuture<'static, Result<Vec<CatalogueEntry>, CatalogueError>> {
        let path = output_path(&self.root, &self.template, locale, self.format.extension());
        let format = self.format.clone();
        let locale = locale.to_string();
        async move {
            let loaded = read_catalogue(&path, &format, &locale).await?;
            if loaded.content.is_none() {
                tracing::warn!(path = %path.display(), "catalogue for {} not found, treating it as empty", locale);
            }
            Ok::<_, CatalogueError>(loaded.entries)
        }
        .boxed()
    }
}

pub struct FallbackResolver<S> {
    source: Arc<S>,
    source_locale: String,
    fallbacks: HashMap<String, Vec<String>>,
    loads: Mutex<HashMap<String, SharedResult<Arc<Vec<CatalogueEntry>>>>>,
    resolutions: Mutex<HashMap<String, SharedResult<Translations>>>,
}

impl<S: CatalogueSource> FallbackResolver<S> {
    pub fn new(
        source: S,
        source_locale: impl Into<String>,
        fallbacks: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            source: Arc::new(source),
            source_locale: source_locale.into(),
            fallbacks,
            loads: Mutex::new(HashMap::new()),
            resolutions: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        let fallbacks = config
            .fallback_locales
            .iter()
            .map(|(locale, fallbacks)| (locale.clone(), fallbacks.clone()))
            .collect();
        Self::new(source, config.source_locale.clone(), fallbacks)
    }

    /// Resolve `locale`, reusing a cached or in-flight resolution.
    pub async fn resolve(&self, locale: &str) -> Result<Translations, Arc<CatalogueError>> {
        let resolution = self
            .resolutions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(locale.to_string())
            .or_insert_with(|| self.start_resolution(locale))
            .clone();
        resolution.await
    }

    /// Messages of the source catalogue, the key set of every resolution.
    pub async fn messages(&self) -> Result<Arc<Vec<CatalogueEntry>>, Arc<CatalogueError>> {
        self.load(&self.source_locale).await
    }

    /// Locales consulted for `locale`, most specific first. Each locale
    /// appears once; a locale reached again through a cycle is skipped.
    pub fn chain(&self, locale: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        self.visit(locale, &mut chain, &mut visited, &mut stack);
        chain
    }

    fn visit(
        &self,
        locale: &str,
        chain: &mut Vec<String>,
        visited: &mut HashSet<String>,
        stack: &mut Vec<String>,
    ) {
        if stack.iter().any(|l| l == locale) {
            tracing::warn!("fallback cycle: {} -> {}", stack.join(" -> "), locale);
            return;
        }
        if !visited.insert(locale.to_string()) {
            return;
        }
        chain.push(locale.to_string());
        stack.push(locale.to_string());

        let configured = self.fallbacks.get(locale).cloned().unwrap_or_default();
        for candidate in &configured {
            self.visit(candidate, chain, visited, stack);
        }
        // The implicit source fallback is not a configured cycle.
        if !visited.contains(&self.source_locale) {
            let source_locale = self.source_locale.clone();
            self.visit(&source_locale, chain, visited, stack);
        }

        stack.pop();
    }

    fn start_resolution(&self, locale: &str) -> SharedResult<Translations> {
        let chain = self.chain(locale);
        tracing::debug!("resolving {} through {}", locale, chain.join(" -> "));

        let messages = self.load(&self.source_locale);
        let layers: Vec<_> = chain.iter().map(|l| self.load(l)).collect();

        async move {
            let messages = messages.await?;
            let layers = try_join_all(layers).await?;
            let indexed: Vec<HashMap<&str, &CatalogueEntry>> =
                layers.iter().map(|layer| index_by_id(layer)).collect();

            let mut translations = BTreeMap::new();
            for message in messages.iter() {
                let found = indexed.iter().find_map(|layer| {
                    layer
                        .get(message.id.as_str())
                        .and_then(|entry| entry.translated())
                });
                if let Some(translation) = found {
                    translations.insert(message.id.clone(), translation.to_string());
                }
            }
            Ok::<_, Arc<CatalogueError>>(Arc::new(translations))
        }
        .boxed()
        .shared()
    }

    fn load(&self, locale: &str) -> SharedResult<Arc<Vec<CatalogueEntry>>> {
        let mut loads = self.loads.lock().unwrap_or_else(PoisonError::into_inner);
        loads
            .entry(locale.to_string())
            .or_insert_with(|| {
                let source = Arc::clone(&self.source);
                let locale = locale.to_string();
                async move {
                    tracing::debug!("loading catalogue for {}", locale);
                    source
                        .load(&locale)
                        .await
                        .map(Arc::new)
                        .map_err(Arc::new)
                }
                .boxed()
                .shared()
            })
            .clone()
    }
}

/// First entry per id, matching a linear scan in file order.
fn index_by_id(entries: &[CatalogueEntry]) -> HashMap<&str, &CatalogueEntry> {
    let mut index = HashMap::with_capacity(entries.len());
    for entry in entries {
        index.entry(entry.id.as_str()).or_insert(entry);
    }
    index
}
