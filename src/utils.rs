/// Mixed-radix counter over `0..radices[0] x 0..radices[1] x ...`, last digit
/// fastest.
///
/// Walks a Cartesian product without recursion. No radices yield a single
/// empty combination, any zero radix yields nothing.
#[derive(Debug, Clone)]
pub struct Odometer {
    radices: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl Odometer {
    pub fn new(radices: Vec<usize>) -> Self {
        let current = if radices.iter().any(|&r| r == 0) {
            None
        } else {
            Some(vec![0; radices.len()])
        };
        Odometer { radices, current }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.clone()?;
        let mut done = true;
        if let Some(digits) = self.current.as_mut() {
            for (d, &r) in digits.iter_mut().zip(&self.radices).rev() {
                *d += 1;
                if *d < r {
                    done = false;
                    break;
                }
                *d = 0;
            }
        }
        if done {
            self.current = None;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let all: Vec<_> = Odometer::new(vec![2, 3]).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[1], vec![0, 1]);
        assert_eq!(all[5], vec![1, 2]);

        assert_eq!(Odometer::new(vec![]).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Odometer::new(vec![3, 0]).count(), 0);
        assert_eq!(Odometer::new(vec![1, 1, 1]).count(), 1);
    }
}
