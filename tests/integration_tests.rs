use dialogvec::{
    normalize_label, AggregationStrategy, DocumentVectorizer, EmbeddingTable, LabelNormalizer, TokenLookup,
    VectorizerConfig, VectorizerError, MAIN_CHARACTERS,
};
use env_logger::{Builder, Env};
use ndarray::arr1;
use std::io::Write;
use tempfile::NamedTempFile;

// Initialize test logger
fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write temp file");
    file
}

const GLOVE: &str = "\
bazinga 1.0 0.0 0.0
penny 0.0 1.0 0.0
knock 0.0 0.0 1.0
:) 0.5 0.5 0.5
#science 2.0 2.0 2.0
";

#[test]
fn test_end_to_end_from_files() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let embeddings = write_temp(GLOVE);
    let config = write_temp(r#"{"strategy": "max", "tokenizer": {"preserve_case": false}}"#);

    let config = VectorizerConfig::from_file(config.path())?;
    let table = EmbeddingTable::from_file(embeddings.path())?;
    assert_eq!(table.dim(), 3);

    let vectorizer = DocumentVectorizer::builder()
        .with_config(&config)
        .with_lookup(table)
        .build()?;
    let labels = config.labels.build()?;

    let records = [
        ("Sheldon", "Knock knock knock, Penny :)"),
        ("Stuart", "Nothing to see here"),
        ("Amy", "BAZINGA #science"),
    ];
    let lines: Vec<&str> = records.iter().map(|(_, line)| *line).collect();
    let features = vectorizer.vectorize(&lines)?;
    let targets = labels.normalize_all(records.iter().map(|(speaker, _)| *speaker));

    assert_eq!(features.dim(), (3, 3));
    assert_eq!(features.row(0), arr1(&[0.5, 1.0, 1.0]));
    assert_eq!(features.row(1), arr1(&[0.0, 0.0, 0.0]));
    assert_eq!(features.row(2), arr1(&[2.0, 2.0, 2.0]));
    assert_eq!(targets, vec!["Sheldon", "Secondary", "Amy"]);
    Ok(())
}

#[test]
fn test_word2vec_file_with_header() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let embeddings = write_temp("2 2\nhello 1 3\nworld 3 1\n");
    let table = EmbeddingTable::from_file(embeddings.path())?;
    let vectorizer = DocumentVectorizer::new(table, AggregationStrategy::Mean)?;
    assert_eq!(vectorizer.vectorize_document("hello, world")?, arr1(&[2.0, 2.0]));
    Ok(())
}

#[test]
fn test_malformed_embedding_file() {
    init();
    let embeddings = write_temp("hello 1 3\nworld 3\n");
    let result = EmbeddingTable::from_file(embeddings.path());
    assert!(matches!(result, Err(VectorizerError::ParseError { line: 2, .. })));
}

#[test]
fn test_missing_embedding_file() {
    init();
    let result = EmbeddingTable::from_file("/no/such/embeddings.txt");
    assert!(matches!(result, Err(VectorizerError::Io(_))));
}

#[test]
fn test_label_normalization() {
    for name in MAIN_CHARACTERS {
        assert_eq!(normalize_label(name), name);
    }
    for name in ["Stuart", "Leslie", "Wil Wheaton", "Mrs. Wolowitz", "end", "SHELDON"] {
        assert_eq!(normalize_label(name), "Secondary");
    }

    let normalizer = LabelNormalizer::default();
    assert_eq!(
        normalizer.normalize_all(["Raj", "Kripke", "Bernadette"]),
        vec!["Raj", "Secondary", "Bernadette"]
    );
}
