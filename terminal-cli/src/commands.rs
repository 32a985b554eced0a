//! Subcommand implementations

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use terminal_core::{unique_documents, MarketDocument, RecordSet};
use terminal_dedup::{detect_file, DuplicateDetector};
use terminal_embedding::{
    EmbeddingClient, EmbeddingProvider, HashingEmbedder, RetrievalEngine, RetrievedDocument,
};
use terminal_research::{AnswerSynthesizer, OpenAIClient};
use tracing::{error, info, warn};

use crate::cli::{AskArgs, ChatArgs, DedupArgs, EmbedderKind, MergeArgs, RetrievalArgs};

type Engine = RetrievalEngine<Box<dyn EmbeddingProvider>, MarketDocument>;

pub fn merge(args: MergeArgs) -> Result<()> {
    let mut sets = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let set = RecordSet::load(path)
            .with_context(|| format!("Failed to load listings from {}", path.display()))?;
        sets.push(set);
    }

    let merged = RecordSet::merge(sets);
    merged
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Merged {} listings from {} sources into {}",
        merged.len(),
        args.inputs.len(),
        args.output.display()
    );
    Ok(())
}

pub fn dedup(args: DedupArgs) -> Result<()> {
    let config = args.policy.detector_config();
    let report = detect_file(&args.input, &args.output, &config)
        .with_context(|| format!("Duplicate detection failed for {}", args.input.display()))?;

    println!(
        "Success! {} The updated data has been saved to {}.",
        report,
        args.output.display()
    );
    Ok(())
}

pub async fn ask(args: AskArgs) -> Result<()> {
    let engine = build_engine(&args.retrieval).await?;
    let synthesizer = build_synthesizer(&args.retrieval);
    answer(&engine, synthesizer.as_deref(), &args.query, args.retrieval.top_k).await
}

pub async fn chat(args: ChatArgs) -> Result<()> {
    let engine = build_engine(&args.retrieval).await?;
    let synthesizer = build_synthesizer(&args.retrieval);

    println!(
        "Chat is ready over {} listings. Ask about your prediction market data.",
        engine.len()
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\nEnter your question (or 'quit' to exit): ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") {
            break;
        }

        // A failed question should not end the session
        if let Err(e) = answer(&engine, synthesizer.as_deref(), query, args.retrieval.top_k).await {
            error!("{:#}", e);
        }
    }

    Ok(())
}

/// Load listings, keep the unique ones, and index them
async fn build_engine(args: &RetrievalArgs) -> Result<Engine> {
    let mut set = RecordSet::load(&args.input)
        .with_context(|| format!("Failed to load listings from {}", args.input.display()))?;

    if args.detect {
        let report = DuplicateDetector::new(args.policy.detector_config()).detect_set(&mut set);
        info!("{}", report);
    }

    let documents = unique_documents(&set);
    info!("Loaded {} unique documents", documents.len());

    let provider = build_provider(args)?;
    RetrievalEngine::build(provider, documents, args.retrieval_config())
        .await
        .context("Failed to build retrieval index")
}

fn build_provider(args: &RetrievalArgs) -> Result<Box<dyn EmbeddingProvider>> {
    match args.embedder {
        EmbedderKind::Hashing => Ok(Box::new(HashingEmbedder::new(args.hashing_dimension)?)),
        EmbedderKind::Openai => {
            let api_key = args
                .openai_api_key
                .clone()
                .ok_or_else(|| anyhow!("OPENAI_API_KEY is required for --embedder openai"))?;
            Ok(Box::new(
                EmbeddingClient::new(api_key)
                    .with_model(&args.embedding_model, args.embedding_dimension),
            ))
        }
    }
}

fn build_synthesizer(args: &RetrievalArgs) -> Option<Box<dyn AnswerSynthesizer>> {
    if args.dry_run {
        return None;
    }
    match &args.openai_api_key {
        Some(key) => Some(Box::new(
            OpenAIClient::with_api_key(key).with_model(&args.chat_model),
        )),
        None => {
            warn!("OPENAI_API_KEY not set, printing retrieved listings only");
            None
        }
    }
}

async fn answer(
    engine: &Engine,
    synthesizer: Option<&dyn AnswerSynthesizer>,
    query: &str,
    k: usize,
) -> Result<()> {
    let results = engine
        .retrieve(query, k)
        .await
        .context("Retrieval failed")?;

    println!("\nRetrieved Documents:");
    print_results(&results);

    if let Some(synthesizer) = synthesizer {
        let context: Vec<String> = results.iter().map(|r| r.document.text.clone()).collect();
        let reply = synthesizer
            .synthesize(query, &context)
            .await
            .context("Answer synthesis failed")?;
        println!("\nAnswer:");
        println!("{}", reply);
    }

    Ok(())
}

fn print_results(results: &[RetrievedDocument<&MarketDocument>]) {
    if results.is_empty() {
        println!("  (no listings indexed)");
    }
    for result in results {
        println!(
            "  {}. {} (distance {:.4})",
            result.rank,
            result.document.one_line(),
            result.distance
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PolicyArgs;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use terminal_embedding::DistanceMetric;

    fn write_json(path: &Path, value: Value) {
        fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn policy(case_insensitive: bool) -> PolicyArgs {
        PolicyArgs {
            key_field: "product".to_string(),
            case_insensitive,
            keep_whitespace: false,
        }
    }

    fn retrieval_args(input: &Path) -> RetrievalArgs {
        RetrievalArgs {
            input: input.to_path_buf(),
            top_k: 2,
            metric: DistanceMetric::Euclidean,
            embedder: EmbedderKind::Hashing,
            hashing_dimension: 64,
            openai_api_key: None,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimension: 1536,
            chat_model: "gpt-4o-mini".to_string(),
            detect: false,
            policy: policy(true),
            dry_run: true,
        }
    }

    #[test]
    fn test_merge_then_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let poly = dir.path().join("polymarket.json");
        let manifold = dir.path().join("manifold.json");
        let combined = dir.path().join("combined.json");
        let processed = dir.path().join("processed.json");

        write_json(
            &poly,
            json!([{"product": "Fed cut in March?", "price": 0.2, "site": "Polymarket"}]),
        );
        write_json(
            &manifold,
            json!([
                {"product": "fed cut in march? ", "price": 0.25, "site": "Manifold"},
                {"product": "Senate flips?", "price": 0.4, "site": "Manifold"}
            ]),
        );

        merge(MergeArgs {
            output: combined.clone(),
            inputs: vec![poly, manifold],
        })
        .unwrap();
        assert_eq!(RecordSet::load(&combined).unwrap().len(), 3);

        dedup(DedupArgs {
            input: combined,
            output: processed.clone(),
            policy: policy(true),
        })
        .unwrap();

        let flags: Vec<Value> = RecordSet::load(&processed)
            .unwrap()
            .records()
            .map(|r| r["is_duplicate"].clone())
            .collect();
        assert_eq!(flags, vec![json!(true), json!(true), json!(false)]);
    }

    #[test]
    fn test_merge_rejects_non_array_source() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        write_json(&bad, json!({"markets": []}));

        let err = merge(MergeArgs {
            output: dir.path().join("out.json"),
            inputs: vec![bad],
        })
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Malformed input"));
    }

    #[tokio::test]
    async fn test_build_engine_with_detection() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.json");
        write_json(
            &raw,
            json!([
                {"product": "A", "price": 1},
                {"product": "a", "price": 2},
                {"product": "B", "price": 3},
                "stray"
            ]),
        );

        let mut args = retrieval_args(&raw);
        let without = build_engine(&args).await.unwrap();
        assert_eq!(without.len(), 3);

        args.detect = true;
        let with = build_engine(&args).await.unwrap();
        assert_eq!(with.len(), 1);
        answer(&with, None, "anything", 5).await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_k_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.json");
        write_json(&raw, json!([{"product": "A"}]));

        let engine = build_engine(&retrieval_args(&raw)).await.unwrap();
        let err = answer(&engine, None, "A", 0).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid k"));
    }

    #[test]
    fn test_openai_embedder_requires_key() {
        let mut args = retrieval_args(Path::new("unused.json"));
        args.embedder = EmbedderKind::Openai;
        assert!(build_provider(&args).is_err());
        assert!(build_synthesizer(&args).is_none());
    }
}
