//! Retrieval orchestration.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use sqlctx_config::{RetrievalSettings, DEFAULT_DOMAIN};
use sqlctx_protocols::{
    EmbeddingProvider, EmbeddingSpace, LogicRecord, MetadataFilter, MetadataStore, SchemaRecord,
    VectorStore, DOMAIN_TAGS_KEY,
};

use crate::detector::DomainDetector;
use crate::domain::{DomainConfig, DomainRegistry};
use crate::error::{Phase, RetrievalError};
use crate::expander::{AutoJoinExpander, Expansion, SchemaLookup, SchemaSnapshot, StoreLookup};
use crate::request::RetrievalRequest;
use crate::result::{RetrievalResult, Strategy};
use crate::scorer::{shortlist, Candidate, HybridScorer};

/// Engine-wide behaviour shared by every domain.
#[derive(Debug, Clone)]
pub struct RetrieverOptions {
    pub auto_join: bool,
    pub max_join_depth: usize,
    /// Pass the requested domain to the vector store as a metadata filter.
    pub filter_by_domain: bool,
    /// Applied by [`Retriever::retrieve`] when set.
    pub timeout: Option<Duration>,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self::from(&RetrievalSettings::default())
    }
}

impl From<&RetrievalSettings> for RetrieverOptions {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            auto_join: settings.auto_join.enabled,
            max_join_depth: settings.auto_join.max_depth,
            filter_by_domain: settings.filter_by_domain,
            timeout: settings.timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Records chosen for one configuration, before detection.
struct Selection {
    strategy: Strategy,
    logics: Vec<Candidate<LogicRecord>>,
    schemas: Vec<SchemaRecord>,
    referenced: BTreeSet<String>,
}

/// Ordered schema list without repeated tables, bounded by `cap`.
struct SchemaList {
    cap: usize,
    seen: HashSet<String>,
    records: Vec<SchemaRecord>,
}

impl SchemaList {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            seen: HashSet::new(),
            records: Vec::new(),
        }
    }

    fn push(&mut self, record: SchemaRecord) {
        if !self.is_full() && self.seen.insert(record.table_name.clone()) {
            self.records.push(record);
        }
    }

    fn is_full(&self) -> bool {
        self.records.len() >= self.cap
    }
}

/// Hybrid retrieval over logic examples and schema descriptions.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    vectors: Arc<dyn VectorStore>,
    metadata: Arc<dyn MetadataStore>,
    domains: Arc<DomainRegistry>,
    options: RetrieverOptions,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vectors: Arc<dyn VectorStore>,
        metadata: Arc<dyn MetadataStore>,
        domains: Arc<DomainRegistry>,
    ) -> Self {
        Self {
            embedder,
            vectors,
            metadata,
            domains,
            options: RetrieverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RetrieverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn domains(&self) -> &Arc<DomainRegistry> {
        &self.domains
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataStore> {
        &self.metadata
    }

    pub fn options(&self) -> &RetrieverOptions {
        &self.options
    }

    /// Every domain with its configuration, default first.
    pub fn list_domains(&self) -> Vec<(String, DomainConfig)> {
        self.domains.list()
    }

    /// Run one retrieval, bounded by the configured timeout if any.
    pub async fn retrieve(
        &self,
        request: RetrievalRequest,
    ) -> Result<RetrievalResult, RetrievalError> {
        match self.options.timeout {
            Some(deadline) => self.retrieve_with_deadline(request, deadline).await,
            None => self.execute(request).await,
        }
    }

    /// Run one retrieval, abandoning it once `deadline` elapses.
    pub async fn retrieve_with_deadline(
        &self,
        request: RetrievalRequest,
        deadline: Duration,
    ) -> Result<RetrievalResult, RetrievalError> {
        tokio::time::timeout(deadline, self.execute(request))
            .await
            .map_err(|_| {
                warn!(?deadline, "Retrieval deadline exceeded");
                RetrievalError::DeadlineExceeded(deadline)
            })?
    }

    async fn execute(&self, request: RetrievalRequest) -> Result<RetrievalResult, RetrievalError> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "retrieve",
            %request_id,
            domain = request.domain_name().unwrap_or("auto")
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: RetrievalRequest) -> Result<RetrievalResult, RetrievalError> {
        let started = Instant::now();
        request.validate()?;

        let query = request.query.trim();
        let overrides = request.overrides();
        let explicit = request.domain_name();
        let config = self.domains.resolve(explicit).with_overrides(&overrides);
        let filter = explicit
            .filter(|_| self.options.filter_by_domain)
            .map(|name| MetadataFilter::new(DOMAIN_TAGS_KEY, name));
        let scorer = HybridScorer::new(query, config.keyword_boost_weight);

        let logic_pool = self.search_logics(query, &config, filter.as_ref()).await?;
        let logics = shortlist(
            &logic_pool,
            config.logic_distance_threshold,
            config.max_logics,
            &scorer,
            logic_text,
        );

        let (schema_pool, selection, snapshot) = if logics.is_empty() {
            let lookup = StoreLookup::new(self.metadata.clone(), Phase::SchemaSearch);
            let pool = self
                .search_schemas(query, &config, filter.as_ref(), &lookup, Phase::SchemaSearch)
                .await?;
            let selection = self
                .select_schema_only(&pool, &config, &scorer, &lookup)
                .await?;
            (pool, selection, lookup.snapshot())
        } else {
            let lookup = StoreLookup::new(self.metadata.clone(), Phase::SchemaExpand);
            let seeds = seed_tables(&logics);
            let expander = AutoJoinExpander::new(&lookup);
            let (expansion, pool) = tokio::try_join!(
                expander.expand(&seeds, self.join_depth(), config.max_schemas),
                self.search_schemas(query, &config, filter.as_ref(), &lookup, Phase::SchemaExpand),
            )?;
            let selection = select_logic_driven(logics, expansion, &pool, &config, &scorer);
            (pool, selection, lookup.snapshot())
        };

        let detection = DomainDetector::detect(
            selection
                .logics
                .iter()
                .map(|c| &c.item.domain_tags)
                .chain(selection.schemas.iter().map(|s| &s.domain_tags)),
        );

        let (domain, selection) = match (explicit, detection.primary.as_deref()) {
            (Some(name), _) => (name.to_string(), selection),
            (None, Some(primary)) if self.domains.contains(primary) => {
                let refined = self.domains.resolve(Some(primary)).with_overrides(&overrides);
                let selection = if refined.is_stricter_than(&config) {
                    debug!(domain = primary, "Re-filtering under detected domain");
                    self.reselect(query, &logic_pool, &schema_pool, &refined, &snapshot)
                        .await?
                } else {
                    selection
                };
                (primary.to_string(), selection)
            }
            // Unregistered tag: the default config already applied.
            (None, Some(primary)) => (primary.to_string(), selection),
            (None, None) => (DEFAULT_DOMAIN.to_string(), selection),
        };

        let logics: Vec<LogicRecord> = selection
            .logics
            .into_iter()
            .map(|candidate| {
                let mut record = candidate.item;
                record.embedding_distance = Some(candidate.distance);
                record
            })
            .collect();

        let result = RetrievalResult {
            strategy: selection.strategy,
            domain,
            logics,
            schemas: selection.schemas,
            detected_domains: detection.domains,
            referenced_tables: selection.referenced,
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        };

        info!(
            strategy = result.strategy.as_str(),
            domain = %result.domain,
            logics = result.logics.len(),
            schemas = result.schemas.len(),
            elapsed_ms = result.processing_time_ms,
            "Retrieval complete"
        );

        Ok(result)
    }

    /// Logic candidates in store order. Hits without a stored record are
    /// dropped.
    async fn search_logics(
        &self,
        query: &str,
        config: &DomainConfig,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Candidate<LogicRecord>>, RetrievalError> {
        if config.max_logics == 0 {
            debug!("Logic search disabled for this domain");
            return Ok(Vec::new());
        }

        let phase = Phase::LogicSearch;
        let vector = self
            .embedder
            .embed(query, EmbeddingSpace::Logic)
            .await
            .map_err(|e| RetrievalError::embedding(phase, e))?;

        let hits = self
            .vectors
            .query(
                EmbeddingSpace::Logic,
                &vector,
                config.logic_distance_threshold,
                config.max_logics,
                filter,
            )
            .await
            .map_err(|e| RetrievalError::vector_store(phase, e))?;

        let records = try_join_all(hits.iter().map(|hit| self.metadata.get_logic(&hit.id)))
            .await
            .map_err(|e| RetrievalError::metadata_store(phase, e))?;

        let mut candidates = Vec::with_capacity(hits.len());
        for (position, (hit, record)) in hits.iter().zip(records).enumerate() {
            match record {
                Some(mut record) => {
                    record.dedup_tables();
                    candidates.push(Candidate::new(record, hit.distance, position));
                }
                None => warn!(id = %hit.id, "Logic hit has no stored record"),
            }
        }

        debug!(hits = hits.len(), candidates = candidates.len(), "Logic search done");
        Ok(candidates)
    }

    /// Schema candidates in store order, loaded through `lookup`.
    async fn search_schemas(
        &self,
        query: &str,
        config: &DomainConfig,
        filter: Option<&MetadataFilter>,
        lookup: &dyn SchemaLookup,
        phase: Phase,
    ) -> Result<Vec<Candidate<SchemaRecord>>, RetrievalError> {
        let vector = self
            .embedder
            .embed(query, EmbeddingSpace::Schema)
            .await
            .map_err(|e| RetrievalError::embedding(phase, e))?;

        let hits = self
            .vectors
            .query(
                EmbeddingSpace::Schema,
                &vector,
                config.schema_distance_threshold,
                config.max_schemas,
                filter,
            )
            .await
            .map_err(|e| RetrievalError::vector_store(phase, e))?;

        let records = try_join_all(hits.iter().map(|hit| lookup.lookup(&hit.id))).await?;

        let candidates: Vec<_> = hits
            .iter()
            .zip(records)
            .enumerate()
            .filter_map(|(position, (hit, record))| {
                record.map(|record| Candidate::new(record, hit.distance, position))
            })
            .collect();

        debug!(hits = hits.len(), candidates = candidates.len(), "Schema search done");
        Ok(candidates)
    }

    /// Ranked schema hits, each followed by the related tables it joins to.
    async fn select_schema_only(
        &self,
        pool: &[Candidate<SchemaRecord>],
        config: &DomainConfig,
        scorer: &HybridScorer,
        lookup: &dyn SchemaLookup,
    ) -> Result<Selection, RetrievalError> {
        let hits = shortlist(
            pool,
            config.schema_distance_threshold,
            config.max_schemas,
            scorer,
            schema_text,
        );

        let expander = AutoJoinExpander::new(lookup);
        let depth = self.join_depth();
        let mut referenced = BTreeSet::new();
        let mut schemas = SchemaList::new(config.max_schemas);

        for hit in hits {
            let table = hit.item.table_name.clone();
            referenced.insert(table.clone());
            schemas.push(hit.item);

            if depth == 0 || schemas.is_full() {
                continue;
            }

            let expansion = expander.expand(&[table], depth, config.max_schemas).await?;
            for related in expansion.tables.iter().skip(1) {
                referenced.insert(related.clone());
                if let Some(record) = expansion.records.get(related) {
                    schemas.push(record.clone());
                }
            }
        }

        Ok(Selection {
            strategy: Strategy::SchemaOnly,
            logics: Vec::new(),
            schemas: schemas.records,
            referenced,
        })
    }

    /// Re-run selection over already-fetched candidates under `config`.
    async fn reselect(
        &self,
        query: &str,
        logic_pool: &[Candidate<LogicRecord>],
        schema_pool: &[Candidate<SchemaRecord>],
        config: &DomainConfig,
        snapshot: &SchemaSnapshot,
    ) -> Result<Selection, RetrievalError> {
        let scorer = HybridScorer::new(query, config.keyword_boost_weight);
        let logics = shortlist(
            logic_pool,
            config.logic_distance_threshold,
            config.max_logics,
            &scorer,
            logic_text,
        );

        if logics.is_empty() {
            return self
                .select_schema_only(schema_pool, config, &scorer, snapshot)
                .await;
        }

        let expansion = AutoJoinExpander::new(snapshot)
            .expand(&seed_tables(&logics), self.join_depth(), config.max_schemas)
            .await?;
        Ok(select_logic_driven(logics, expansion, schema_pool, config, &scorer))
    }

    fn join_depth(&self) -> usize {
        if self.options.auto_join {
            self.options.max_join_depth
        } else {
            0
        }
    }
}

/// Expanded tables first, then direct schema hits within the remaining
/// budget.
fn select_logic_driven(
    logics: Vec<Candidate<LogicRecord>>,
    expansion: Expansion,
    schema_pool: &[Candidate<SchemaRecord>],
    config: &DomainConfig,
    scorer: &HybridScorer,
) -> Selection {
    let mut referenced: BTreeSet<String> = logics
        .iter()
        .flat_map(|c| c.item.tables.iter().cloned())
        .collect();
    referenced.extend(expansion.tables.iter().cloned());

    let mut schemas = SchemaList::new(config.max_schemas);
    for record in expansion.records_in_order() {
        schemas.push(record.clone());
    }

    let budget = config.max_schemas.saturating_sub(expansion.record_count());
    let hits = shortlist(
        schema_pool,
        config.schema_distance_threshold,
        budget,
        scorer,
        schema_text,
    );
    for hit in hits {
        referenced.insert(hit.item.table_name.clone());
        schemas.push(hit.item);
    }

    Selection {
        strategy: Strategy::LogicDriven,
        logics,
        schemas: schemas.records,
        referenced,
    }
}

/// Tables of the selected logics, in rank order.
fn seed_tables(logics: &[Candidate<LogicRecord>]) -> Vec<String> {
    let mut seen = HashSet::new();
    logics
        .iter()
        .flat_map(|c| c.item.tables.iter())
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

fn logic_text(record: &LogicRecord) -> String {
    record.natural_query.clone()
}

fn schema_text(record: &SchemaRecord) -> String {
    record.description.clone()
}

#[cfg(test)]
#[path = "retriever_tests.rs"]
mod tests;
