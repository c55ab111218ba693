//! Integration tests for exporting generated matrices to sprs

use datagen::{rand_matrix, DatagenConfig, RandomMatrixDescriptor};

#[test]
fn test_sparse_matrix_to_csr() {
    let desc = RandomMatrixDescriptor::uniform(300, 200, 64, 64, 0.02, 1.0, 2.0).unwrap();
    let m = rand_matrix(&desc, &DatagenConfig::default().with_seed(1).with_threads(1)).unwrap();
    assert!(m.is_sparse());

    let sp = m.to_csr();
    assert!(sp.is_csr());
    assert_eq!(sp.shape(), (300, 200));
    assert_eq!(sp.nnz() as u64, m.nnz());
    for (&v, (i, j)) in sp.iter() {
        assert_eq!(v, m.get(i, j));
    }
}

#[test]
fn test_dense_matrix_to_csr() {
    let desc = RandomMatrixDescriptor::uniform(50, 70, 16, 16, 0.9, -1.0, 1.0).unwrap();
    let m = rand_matrix(&desc, &DatagenConfig::default().with_seed(2).with_threads(1)).unwrap();
    assert!(!m.is_sparse());

    let sp = m.to_csr();
    assert_eq!(sp.shape(), (50, 70));
    assert_eq!(sp.nnz() as u64, m.nnz());
    for (i, row) in sp.outer_iterator().enumerate() {
        let cols: Vec<usize> = row.indices().to_vec();
        assert!(cols.windows(2).all(|w| w[0] < w[1]), "row {} not sorted", i);
        for (j, &v) in row.iter() {
            assert_eq!(v, m.get(i, j));
        }
    }
}

#[test]
fn test_csr_matches_dense_view() {
    let desc = RandomMatrixDescriptor::normal(40, 40, 10, 10, 0.1).unwrap();
    let m = rand_matrix(&desc, &DatagenConfig::default().with_seed(3)).unwrap();
    assert_eq!(m.to_csr().to_dense(), m.to_dense());
}
