use super::*;
use crate::length::CharCount;
use crate::testing::capture_warnings;

fn config(size: usize, overlap: usize) -> ChunkerConfig {
    ChunkerConfig::builder()
        .chunk_size(size)
        .chunk_overlap(overlap)
        .build()
        .unwrap()
}

fn words(source: &str) -> Vec<&str> {
    source.split(' ').collect()
}

fn texts(chunks: &[MergedChunk]) -> Vec<&str> {
    chunks.iter().map(|c| c.text.as_str()).collect()
}

fn starts(chunks: &[MergedChunk]) -> Vec<usize> {
    chunks.iter().map(|c| c.start).collect()
}

#[test]
fn test_merge_with_overlap_windows() {
    let config = config(4, 2);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "A B C D E F";
    let chunks = merger.merge(source, &words(source), " ");
    assert_eq!(texts(&chunks), vec!["A B", "B C", "C D", "D E", "E F"]);
    assert_eq!(starts(&chunks), vec![0, 2, 4, 6, 8]);
}

#[test]
fn test_merge_without_overlap() {
    let config = config(5, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "aaaaabbbbbcccccddddd";
    let fragments: Vec<&str> = (0..source.len()).map(|i| &source[i..i + 1]).collect();
    let chunks = merger.merge(source, &fragments, "");
    assert_eq!(texts(&chunks), vec!["aaaaa", "bbbbb", "ccccc", "ddddd"]);
    assert_eq!(starts(&chunks), vec![0, 5, 10, 15]);
}

#[test]
fn test_merge_counts_separator_between_fragments() {
    let config = config(10, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    // "Hello world" is 11 chars once the separator is counted
    let source = "Hello world this is";
    let chunks = merger.merge(source, &words(source), " ");
    assert_eq!(texts(&chunks), vec!["Hello", "world this", "is"]);
}

#[test]
fn test_merge_empty_input() {
    let config = config(10, 0);
    let merger = ChunkMerger::new(&config, &CharCount);
    assert!(merger.merge("", &[], " ").is_empty());
}

#[test]
fn test_repeated_text_offsets_follow_fragments() {
    let config = config(5, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "ab ab ab ab";
    let chunks = merger.merge(source, &words(source), " ");
    assert_eq!(texts(&chunks), vec!["ab ab", "ab ab"]);
    assert_eq!(starts(&chunks), vec![0, 6]);
}

#[test]
fn test_merge_drops_whitespace_only_chunks() {
    let config = config(3, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "   ab  ";
    let fragments = [&source[0..3], &source[3..5], &source[5..7]];
    let chunks = merger.merge(source, &fragments, "");
    assert_eq!(texts(&chunks), vec!["ab"]);
    // stripped whitespace moves the start forward
    assert_eq!(starts(&chunks), vec![3]);
}

#[test]
fn test_merge_keeps_whitespace_when_not_stripping() {
    let config = ChunkerConfig::builder()
        .chunk_size(4)
        .chunk_overlap(0)
        .strip_whitespace(false)
        .build()
        .unwrap();
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = " ab cd";
    let chunks = merger.merge(source, &[&source[0..3], &source[3..6]], "");
    assert_eq!(texts(&chunks), vec![" ab", " cd"]);
    assert_eq!(starts(&chunks), vec![0, 3]);
}

#[test]
fn test_visible_separator_between_blank_fragments() {
    let config = config(10, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "  ,  ";
    let chunks = merger.merge(source, &source.split(',').collect::<Vec<_>>(), ",");
    assert_eq!(texts(&chunks), vec![","]);
    assert_eq!(starts(&chunks), vec![2]);
}

#[test]
fn test_oversized_fragment_is_emitted_whole() {
    let config = config(3, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "ab abcdefgh c";
    let (chunks, warnings) = capture_warnings(|| merger.merge(source, &words(source), " "));
    assert_eq!(texts(&chunks), vec!["ab", "abcdefgh", "c"]);
    assert_eq!(starts(&chunks), vec![0, 3, 12]);

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["component"], "chunk_merger");
    assert_eq!(warnings[0]["chunk_size"], "3");
    assert_eq!(warnings[0]["actual"], "8");
}

#[test]
fn test_unsplittable_fragment_warns_once() {
    let config = config(10, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "supercalifragilistic";
    let (chunk, warnings) = capture_warnings(|| merger.oversized(source, source));
    assert_eq!(
        chunk,
        Some(MergedChunk {
            text: source.to_string(),
            start: 0
        })
    );

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["component"], "recursive_chunker");
    assert_eq!(warnings[0]["chunk_size"], "10");
    assert_eq!(warnings[0]["actual"], "20");
}

#[test]
fn test_fitting_chunks_do_not_warn() {
    let config = config(10, 2);
    let merger = ChunkMerger::new(&config, &CharCount);

    let source = "one two three four five";
    let (chunks, warnings) = capture_warnings(|| {
        let mut chunks = merger.merge(source, &words(source), " ");
        chunks.extend(merger.oversized(source, &source[0..3]));
        chunks
    });
    assert!(chunks.len() > 1);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_overlap_never_exceeds_budget() {
    let source = (0..40)
        .map(|i| format!("w{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let config = config(20, 7);
    let merger = ChunkMerger::new(&config, &CharCount);

    let chunks = merger.merge(&source, &words(&source), " ");
    assert!(chunks.len() > 1);

    for pair in chunks.windows(2) {
        let previous: Vec<&str> = pair[0].text.split(' ').collect();
        let next: Vec<&str> = pair[1].text.split(' ').collect();

        // words are unique, so the shared words are exactly the overlap
        let shared: Vec<&str> = next
            .iter()
            .copied()
            .filter(|w| previous.contains(w))
            .collect();
        let overlap = if shared.is_empty() {
            0
        } else {
            shared.iter().map(|w| w.len()).sum::<usize>() + shared.len() - 1
        };
        assert!(overlap <= 7, "overlap {} between {:?}", overlap, pair);
    }

    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 20, "chunk {:?} too large", chunk);
        assert!(source[chunk.start..].starts_with(&chunk.text));
    }
}

#[test]
fn test_remerge_is_idempotent() {
    let source = (0..30)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let config = config(24, 0);
    let merger = ChunkMerger::new(&config, &CharCount);
    let chunks = merger.merge(&source, &words(&source), " ");

    let largest = chunks.iter().map(|c| c.text.chars().count()).max().unwrap();
    let config = self::config(largest, 0);
    let merger = ChunkMerger::new(&config, &CharCount);

    // lay the chunks out again as slices of one text
    let joined = texts(&chunks).join(" ");
    let mut at = 0;
    let as_fragments: Vec<&str> = chunks
        .iter()
        .map(|chunk| {
            let fragment = &joined[at..at + chunk.text.len()];
            at += chunk.text.len() + 1;
            fragment
        })
        .collect();

    let remerged = merger.merge(&joined, &as_fragments, " ");
    assert_eq!(texts(&remerged), texts(&chunks));
}

#[test]
fn test_merge_with_custom_measure() {
    let config = config(2, 0);
    let words_measure = |text: &str| text.split_whitespace().count();
    let merger = ChunkMerger::new(&config, &words_measure);

    // each fragment is one word; the separator measures zero words
    let source = "alpha beta gamma delta epsilon";
    let chunks = merger.merge(source, &words(source), " ");
    assert_eq!(texts(&chunks), vec!["alpha beta", "gamma delta", "epsilon"]);
}
