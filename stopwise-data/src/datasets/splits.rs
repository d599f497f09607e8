use super::labeled_split::LabeledSplit;
use stopwise_core::StopwiseError;

/// The train / validation / test partitions of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSplits {
    train: LabeledSplit,
    valid: LabeledSplit,
    test: LabeledSplit,
}

impl DataSplits {
    /// Groups three splits.
    ///
    /// # Errors
    ///
    /// Returns `StopwiseError::DataError` if the splits do not share the same
    /// feature dimensionality.
    pub fn new(train: LabeledSplit, valid: LabeledSplit, test: LabeledSplit) -> Result<Self, StopwiseError> {
        let n = train.n_features();
        for (name, split) in [("validation", &valid), ("test", &test)] {
            if split.n_features() != n {
                return Err(StopwiseError::DataError(format!(
                    "{} split has {} features, train split has {}",
                    name,
                    split.n_features(),
                    n
                )));
            }
        }
        Ok(DataSplits { train, valid, test })
    }

    /// Carves one split into train (`n_train` first examples), validation
    /// (next `n_valid`) and test (the rest), keeping the original order.
    pub fn partition(all: &LabeledSplit, n_train: usize, n_valid: usize) -> Result<Self, StopwiseError> {
        let total = all.len();
        let too_many = || {
            StopwiseError::DataError(format!(
                "cannot take {} train and {} validation examples out of {}",
                n_train, n_valid, total
            ))
        };
        let held_out = n_train.checked_add(n_valid).ok_or_else(too_many)?;
        if held_out > total {
            return Err(too_many());
        }
        DataSplits::new(
            all.slice(0..n_train)?,
            all.slice(n_train..held_out)?,
            all.slice(held_out..total)?,
        )
    }

    pub fn train(&self) -> &LabeledSplit {
        &self.train
    }

    pub fn valid(&self) -> &LabeledSplit {
        &self.valid
    }

    pub fn test(&self) -> &LabeledSplit {
        &self.test
    }

    pub fn n_features(&self) -> usize {
        self.train.n_features()
    }

    /// Number of classes seen across all three splits.
    pub fn n_classes(&self) -> usize {
        self.train
            .n_classes()
            .max(self.valid.n_classes())
            .max(self.test.n_classes())
    }

    /// Fails with `DataError` naming the first empty split, if any.
    pub fn ensure_non_empty(&self) -> Result<(), StopwiseError> {
        for (name, split) in [("train", &self.train), ("validation", &self.valid), ("test", &self.test)] {
            if split.is_empty() {
                return Err(StopwiseError::DataError(format!("the {} split is empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(n: usize, n_features: usize) -> LabeledSplit {
        let labels: Vec<usize> = (0..n).map(|i| i % 3).collect();
        let features: Vec<f32> = (0..n * n_features).map(|v| v as f32).collect();
        LabeledSplit::new(features, labels, n_features).unwrap()
    }

    #[test]
    fn test_new_checks_dimensionality() {
        assert!(DataSplits::new(split(4, 2), split(2, 2), split(2, 3)).is_err());
        let splits = DataSplits::new(split(4, 2), split(2, 2), split(2, 2)).unwrap();
        assert_eq!(splits.n_features(), 2);
        assert_eq!(splits.n_classes(), 3);
    }

    #[test]
    fn test_partition_keeps_order() {
        let all = split(10, 1);
        let splits = DataSplits::partition(&all, 6, 3).unwrap();
        assert_eq!(splits.train().len(), 6);
        assert_eq!(splits.valid().features(), &[6.0, 7.0, 8.0]);
        assert_eq!(splits.test().features(), &[9.0]);
        assert!(DataSplits::partition(&all, 8, 3).is_err());
    }

    #[test]
    fn test_partition_sizes_that_overflow_are_data_errors() {
        let all = split(10, 1);
        assert!(matches!(
            DataSplits::partition(&all, usize::MAX, 1),
            Err(StopwiseError::DataError(_))
        ));
        assert!(matches!(
            DataSplits::partition(&all, 1, usize::MAX),
            Err(StopwiseError::DataError(_))
        ));
    }

    #[test]
    fn test_ensure_non_empty() {
        let all = split(10, 1);
        let splits = DataSplits::partition(&all, 5, 5).unwrap();
        match splits.ensure_non_empty() {
            Err(StopwiseError::DataError(msg)) => assert!(msg.contains("test")),
            other => panic!("Expected DataError, got {:?}", other),
        }
    }
}
