use dialogvec::{
    aggregate, vectorize, AggregationStrategy, DocumentVectorizer, EmbeddingTable, TokenLookup, VectorizerError,
};
use ndarray::{arr1, Array1, Array2};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn pets() -> HashMap<String, Vec<f32>> {
    let mut lookup = HashMap::new();
    lookup.insert("cat".to_string(), vec![1.0, 2.0]);
    lookup.insert("dog".to_string(), vec![3.0, 4.0]);
    lookup
}

fn collinear_pets() -> HashMap<String, Vec<f32>> {
    let mut lookup = HashMap::new();
    lookup.insert("cat".to_string(), vec![1.0, 0.0]);
    lookup.insert("dog".to_string(), vec![3.0, 0.0]);
    lookup
}

#[test]
fn test_out_of_vocabulary_document_is_zero() {
    let rows = vectorize(&["zzzqqq wwweee"], &pets(), 2, AggregationStrategy::Mean).unwrap();
    assert_eq!(rows, Array2::<f32>::zeros((1, 2)));
}

#[test]
fn test_mean_of_known_tokens() {
    let rows = vectorize(&["cat dog"], &collinear_pets(), 2, AggregationStrategy::Mean).unwrap();
    assert_eq!(rows.row(0), arr1(&[2.0, 0.0]));
}

#[test]
fn test_unknown_tokens_are_excluded_from_mean() {
    let rows = vectorize(&["cat zzz dog"], &collinear_pets(), 2, AggregationStrategy::Mean).unwrap();
    assert_eq!(rows.row(0), arr1(&[2.0, 0.0]));
}

#[test]
fn test_empty_document_list() {
    let rows = vectorize::<&str, _>(&[], &pets(), 2, AggregationStrategy::Max).unwrap();
    assert_eq!(rows.dim(), (0, 2));
}

#[test]
fn test_shape_and_order_are_preserved() {
    let docs = ["dog", "nothing known", "cat", "cat dog", ""];
    for strategy in AggregationStrategy::ALL {
        let rows = vectorize(&docs, &pets(), 2, strategy).unwrap();
        assert_eq!(rows.dim(), (docs.len(), 2));
        assert_eq!(rows.row(0), arr1(&[3.0, 4.0]));
        assert_eq!(rows.row(1), arr1(&[0.0, 0.0]));
        assert_eq!(rows.row(2), arr1(&[1.0, 2.0]));
        assert_eq!(rows.row(4), arr1(&[0.0, 0.0]));
    }

    let max = vectorize(&docs, &pets(), 2, AggregationStrategy::Max).unwrap();
    let min = vectorize(&docs, &pets(), 2, AggregationStrategy::Min).unwrap();
    assert_eq!(max.row(3), arr1(&[3.0, 4.0]));
    assert_eq!(min.row(3), arr1(&[1.0, 2.0]));
}

#[test]
fn test_punctuation_next_to_known_tokens() {
    let rows = vectorize(&["cat, dog!!!"], &collinear_pets(), 2, AggregationStrategy::Mean).unwrap();
    assert_eq!(rows.row(0), arr1(&[2.0, 0.0]));
}

#[test]
fn test_aggregate_matches_elementwise_definitions() {
    let vectors: Vec<Array1<f32>> = vec![
        arr1(&[0.5, -1.0, 4.0, 2.0]),
        arr1(&[1.5, 3.0, -4.0, 2.0]),
        arr1(&[-2.0, 1.0, 0.0, 2.0]),
    ];
    let views: Vec<_> = vectors.iter().map(|v| v.view()).collect();

    let mean = aggregate(&views, AggregationStrategy::Mean).unwrap();
    let max = aggregate(&views, AggregationStrategy::Max).unwrap();
    let min = aggregate(&views, AggregationStrategy::Min).unwrap();

    for d in 0..4 {
        let column: Vec<f32> = vectors.iter().map(|v| v[d]).collect();
        let expected_mean = column.iter().sum::<f32>() / column.len() as f32;
        assert!((mean[d] - expected_mean).abs() < 1e-6);
        assert_eq!(max[d], column.iter().cloned().fold(f32::MIN, f32::max));
        assert_eq!(min[d], column.iter().cloned().fold(f32::MAX, f32::min));
    }
    assert_eq!(mean.len(), 4);
}

#[test]
fn test_unrecognized_strategy_cannot_be_constructed() {
    for name in ["unknown_strategy", "sum", "Mean", ""] {
        assert!(matches!(
            name.parse::<AggregationStrategy>(),
            Err(VectorizerError::UnknownStrategy(_))
        ));
    }
}

#[test]
fn test_dimension_mismatch_is_descriptive() {
    let err = vectorize(&["cat"], &pets(), 3, AggregationStrategy::Mean).unwrap_err();
    assert!(matches!(err, VectorizerError::DimensionMismatch { expected: 3, actual: 2, .. }));
    assert!(err.to_string().contains("expected 3, got 2"));
}

#[test]
fn test_vectorizer_object_matches_free_function() {
    let table = EmbeddingTable::from_pairs(2, pets()).unwrap();
    assert_eq!(table.dim(), 2);
    let vectorizer = DocumentVectorizer::new(table, AggregationStrategy::Mean).unwrap();

    let docs = vec!["cat dog".to_string(), "dog dog cat".to_string(), "bird".to_string()];
    let from_object = vectorizer.vectorize(&docs).unwrap();
    let from_function = vectorize(&docs, &pets(), 2, AggregationStrategy::Mean).unwrap();
    assert_eq!(from_object, from_function);

    for (i, doc) in docs.iter().enumerate() {
        assert_eq!(vectorizer.vectorize_document(doc).unwrap(), from_object.row(i));
    }
}

#[test]
fn test_thread_safety() {
    let table = EmbeddingTable::from_pairs(2, pets()).unwrap();
    let vectorizer = Arc::new(DocumentVectorizer::new(table, AggregationStrategy::Max).unwrap());
    let mut handles = vec![];

    for i in 0..3 {
        let vectorizer = Arc::clone(&vectorizer);
        let handle = thread::spawn(move || {
            let doc = if i % 2 == 0 { "cat dog" } else { "dog" };
            let result = vectorizer.vectorize(&[doc]);
            assert!(result.is_ok());
            result.unwrap()
        });
        handles.push(handle);
    }

    for handle in handles {
        let rows = handle.join().unwrap();
        assert_eq!(rows.row(0), arr1(&[3.0, 4.0]));
    }
}
