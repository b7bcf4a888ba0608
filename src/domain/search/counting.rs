// なぞり候補数の数え上げ

use anyhow::Result;

use super::explorer::walk_traces;
use crate::constants::CELL_NUM;

/// 全セルがなぞれる盤面で、長さ max_trace_num 以下のなぞりの数
pub fn count_up(max_trace_num: usize) -> Result<u64> {
    let mut count = 0u64;
    if max_trace_num == 0 {
        return Ok(count);
    }
    for root in 0..CELL_NUM {
        walk_traces(root, max_trace_num, |_| true, |_| {
            count += 1;
            Ok(())
        })?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_known_values() {
        let expected = [0u64, 48, 200, 804, 3435, 15359];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(count_up(n).unwrap(), *want, "n = {}", n);
        }
    }

    #[test]
    fn counts_grow_with_length() {
        assert!(count_up(6).unwrap() > count_up(5).unwrap());
    }
}
