//! Single-axis flex distribution.
//!
//! Each child starts at its flex basis. A surplus of main-axis space is
//! handed out in proportion to `grow`; a deficit is taken back in
//! proportion to `shrink`. Children with a zero factor keep their basis,
//! and no child is shrunk below zero: a child that would be is frozen at
//! zero and the rest of the deficit is shared among the others.

use weft_types::FlexRounding;

/// Main-axis inputs of one flex child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    pub basis: f32,
    pub grow: f32,
    pub shrink: f32,
}

impl FlexItem {
    pub fn new(basis: f32, grow: f32, shrink: f32) -> Self {
        Self {
            basis,
            grow,
            shrink,
        }
    }
}

/// Final main sizes for `items` sharing `available` space.
pub fn distribute(items: &[FlexItem], available: f32, rounding: FlexRounding) -> Vec<f32> {
    let bases: Vec<f32> = items.iter().map(|i| i.basis.max(0.0)).collect();
    let delta = available - bases.iter().sum::<f32>();
    log::trace!(
        "flex: {} items, available {available}, delta {delta}",
        items.len()
    );

    if delta > 0.0 {
        grow(items, bases, delta, rounding)
    } else if delta < 0.0 {
        shrink(items, bases, -delta, rounding)
    } else {
        bases
    }
}

fn grow(
    items: &[FlexItem],
    mut sizes: Vec<f32>,
    surplus: f32,
    rounding: FlexRounding,
) -> Vec<f32> {
    let weights: Vec<(usize, f32)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.grow > 0.0)
        .map(|(i, item)| (i, item.grow))
        .collect();
    for (i, share) in shares(surplus, &weights, rounding) {
        sizes[i] += share;
    }
    sizes
}

fn shrink(
    items: &[FlexItem],
    bases: Vec<f32>,
    mut deficit: f32,
    rounding: FlexRounding,
) -> Vec<f32> {
    let mut sizes = bases.clone();
    let mut frozen = vec![false; items.len()];
    loop {
        let weights: Vec<(usize, f32)> = items
            .iter()
            .enumerate()
            .filter(|&(i, item)| !frozen[i] && item.shrink > 0.0)
            .map(|(i, item)| (i, item.shrink))
            .collect();
        if weights.is_empty() || deficit <= 0.0 {
            return sizes;
        }

        let overshoot: Vec<usize> = shares(deficit, &weights, FlexRounding::Exact)
            .into_iter()
            .filter(|&(i, share)| share > bases[i])
            .map(|(i, _)| i)
            .collect();
        if overshoot.is_empty() {
            for (i, share) in shares(deficit, &weights, rounding) {
                sizes[i] = (bases[i] - share).max(0.0);
            }
            return sizes;
        }
        for i in overshoot {
            frozen[i] = true;
            sizes[i] = 0.0;
            deficit -= bases[i];
        }
    }
}

/// Split `total` between `weights`.
///
/// `Exact` gives the last entry whatever the others leave, so the shares
/// always sum to `total`. `LargestRemainder` hands out whole pixels: every
/// share is floored and the leftover pixels of `total.round()` go to the
/// largest fractional parts, ties to the earlier child.
fn shares(total: f32, weights: &[(usize, f32)], rounding: FlexRounding) -> Vec<(usize, f32)> {
    let weight_sum: f32 = weights.iter().map(|&(_, w)| w).sum();
    if weights.is_empty() || weight_sum <= 0.0 {
        return Vec::new();
    }
    let raw: Vec<f32> = weights
        .iter()
        .map(|&(_, w)| total * w / weight_sum)
        .collect();

    let amounts = match rounding {
        FlexRounding::Exact => {
            let mut amounts = raw;
            let last = amounts.len() - 1;
            let given: f32 = amounts[..last].iter().sum();
            amounts[last] = total - given;
            amounts
        },
        FlexRounding::LargestRemainder => {
            let mut amounts: Vec<f32> = raw.iter().map(|r| r.floor()).collect();
            let leftover = (total.round() - amounts.iter().sum::<f32>()).max(0.0) as usize;
            let mut order: Vec<usize> = (0..raw.len()).collect();
            order.sort_by(|&a, &b| {
                let fa = raw[a] - amounts[a];
                let fb = raw[b] - amounts[b];
                fb.total_cmp(&fa).then(a.cmp(&b))
            });
            for &k in order.iter().take(leftover) {
                amounts[k] += 1.0;
            }
            amounts
        },
    };

    weights
        .iter()
        .zip(amounts)
        .map(|(&(i, _), amount)| (i, amount))
        .collect()
}
