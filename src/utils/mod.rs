//! Utility functions and helpers

/// Computes an exclusive prefix sum (scan) for a vector
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// Integer ceiling division
pub fn ceil_div(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}

/// Extent of block `index` along an axis of length `len` with block size
/// `block_len`; the last block is truncated to the remainder
pub fn block_extent(len: usize, index: usize, block_len: usize) -> usize {
    let start = index * block_len;
    block_len.min(len.saturating_sub(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        let input = vec![1, 2, 3, 4];
        let expected = vec![0, 1, 3, 6, 10];
        assert_eq!(exclusive_scan(&input), expected);

        let input = vec![0, 0, 5, 0];
        let expected = vec![0, 0, 0, 5, 5];
        assert_eq!(exclusive_scan(&input), expected);
    }

    #[test]
    fn test_block_extent() {
        assert_eq!(ceil_div(2500, 1000), 3);
        assert_eq!(block_extent(2500, 0, 1000), 1000);
        assert_eq!(block_extent(2500, 2, 1000), 500);
        assert_eq!(block_extent(10, 0, 1000), 10);
    }
}
