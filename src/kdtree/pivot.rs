use std::cmp::Ordering;

use rand::Rng;

use super::{CompareAlongDimension, Dim};

fn order<P: CompareAlongDimension>(a: &P, b: &P, dim: Dim) -> Ordering {
    a.compare(b, dim).total_cmp(&0.0)
}

/// Estimate the median of `data` along `dim` from at most `sample` randomly
/// chosen elements. The sample is moved to the front of `data` and the
/// returned index is the position of its median.
pub(super) fn median_of_randoms<P, R>(data: &mut [P], dim: Dim, sample: usize, rng: &mut R) -> usize
where
    P: CompareAlongDimension,
    R: Rng + ?Sized,
{
    let n = data.len();
    let k = sample.clamp(1, n);
    if k < n {
        for i in 0..k {
            let j = rng.gen_range(i..n);
            data.swap(i, j);
        }
    }

    let mid = k / 2;
    data[..k].select_nth_unstable_by(mid, |a, b| order(a, b, dim));
    mid
}

/// Move the element at `pivot` to its sorted position along `dim` and return
/// that position. Everything before it compares less than or equal to it,
/// everything after it compares greater.
pub(super) fn partition<P: CompareAlongDimension>(data: &mut [P], pivot: usize, dim: Dim) -> usize {
    let last = data.len() - 1;
    data.swap(pivot, last);

    let mut store = 0;
    for i in 0..last {
        if order(&data[i], &data[last], dim) != Ordering::Greater {
            data.swap(store, i);
            store += 1;
        }
    }
    data.swap(last, store);
    store
}
