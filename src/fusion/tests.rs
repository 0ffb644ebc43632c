use super::*;

fn ids(fused: &[FusedCandidate]) -> Vec<&str> {
    fused.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn test_rrf_single_list() {
    let fused = reciprocal_rank_fusion(&["a", "b", "c"], &[] as &[&str]);
    assert_eq!(ids(&fused), vec!["a", "b", "c"]);
    assert!((fused[0].score - 1.0 / 61.0).abs() < 1e-12);
    assert!((fused[2].score - 1.0 / 63.0).abs() < 1e-12);
}

#[test]
fn test_rrf_overlap_sums_contributions() {
    let fused = reciprocal_rank_fusion(&["a", "b"], &["b", "c"]);
    let b = fused.iter().find(|c| c.id == "b").unwrap();
    assert!((b.score - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-12);
    assert_eq!(b.dense_rank, Some(2));
    assert_eq!(b.sparse_rank, Some(1));
    assert_eq!(fused[0].id, "b");
}

#[test]
fn test_rank_one_in_both_beats_rank_one_in_one() {
    let fused = reciprocal_rank_fusion(&["both", "dense_only"], &["both", "sparse_only"]);
    let both = fused.iter().find(|c| c.id == "both").unwrap();
    let single = 1.0 / (RRF_K + 1.0);
    assert!(both.score > single);
    assert!((both.score - 2.0 * single).abs() < 1e-12);
    assert_eq!(fused[0].id, "both");
}

#[test]
fn test_tie_broken_by_dense_rank() {
    // "s" is rank 1 sparse only, "d" is rank 1 dense only: equal scores.
    let fused = reciprocal_rank_fusion(&["d"], &["s"]);
    assert_eq!(fused[0].score, fused[1].score);
    assert_eq!(ids(&fused), vec!["d", "s"]);
}

#[test]
fn test_tie_without_dense_rank_keeps_insertion_order() {
    let fused = reciprocal_rank_fusion_with_k(&[] as &[&str], &["x", "y"], 0.0);
    assert_eq!(ids(&fused), vec!["x", "y"]);

    // identical lists fed twice are deterministic
    let again = reciprocal_rank_fusion_with_k(&[] as &[&str], &["x", "y"], 0.0);
    assert_eq!(fused, again);
}

#[test]
fn test_fusion_is_deterministic() {
    let dense = ["p1", "p2", "p3", "p4"];
    let sparse = ["p3", "f.txt", "p1", "g.txt"];
    let first = reciprocal_rank_fusion(&dense, &sparse);
    for _ in 0..10 {
        assert_eq!(reciprocal_rank_fusion(&dense, &sparse), first);
    }
}

#[test]
fn test_sparse_only_flag() {
    let fused = reciprocal_rank_fusion(&["a"], &["b"]);
    let b = fused.iter().find(|c| c.id == "b").unwrap();
    assert!(b.is_sparse_only());
    assert!(!fused.iter().find(|c| c.id == "a").unwrap().is_sparse_only());
}

#[test]
fn test_duplicate_ids_count_once_per_modality() {
    let fused = reciprocal_rank_fusion(&["a", "a"], &["a", "a"]);
    assert_eq!(fused.len(), 1);
    assert!((fused[0].score - 2.0 / 61.0).abs() < 1e-12);
}

#[test]
fn test_empty_inputs() {
    assert!(reciprocal_rank_fusion(&[] as &[&str], &[] as &[&str]).is_empty());
}

#[test]
fn test_heterogeneous_identifier_spaces() {
    let dense = ["6f1c8a52-1d1e-4b4e-9d61-0c6f0e2b9a77"];
    let sparse = ["handbook.txt"];
    let fused = reciprocal_rank_fusion(&dense, &sparse);
    assert_eq!(fused.len(), 2);
    assert_eq!(fused[0].dense_rank, Some(1));
    assert_eq!(fused[1].sparse_rank, Some(1));
}
