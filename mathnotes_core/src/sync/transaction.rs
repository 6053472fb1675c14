use thiserror::Error;

/// A transaction that can be executed on some type `V`, modifying it.
pub trait Transaction<V> {
    /// Executes the transaction on the given `V`, modifying it. If the
    /// transaction is successful, returns a function that can be used to
    /// roll back the transaction; when given a `V` in the exact state after
    /// this transaction executed, the rollback is guaranteed to
    /// modify the `V` into the exact state before this transaction executed. If
    /// the execution is unsuccessful, the `V` must remain unchanged.
    fn execute(&self, value: &mut V) -> Result<Rollback<V>, TransactionError>;
}

pub type Rollback<V> = Box<dyn Fn(&mut V)>;

/// Error type for executing transactions.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TransactionError {
    #[error("An entity with id {0} already exists.")]
    DuplicateId(u64),
    #[error("There is no entity with id {0}.")]
    NotFound(u64),
}

/// Executes all the given transactions on the given value and returns the
/// rollback of each one, in execution order. If one of the transactions
/// fails, then the entire process is rolled back as if nothing happened at
/// all. The error and index of the transaction that failed is returned.
pub fn execute_all_or_roll_back<'a, V, I, T>(
    value: &mut V,
    transactions: I,
) -> Result<Vec<Rollback<V>>, (TransactionError, usize)>
where
    I: IntoIterator<Item = &'a T>,
    T: Transaction<V> + 'a,
{
    let mut rollback_stack = Vec::new();
    for (i, transaction) in transactions.into_iter().enumerate() {
        match transaction.execute(value) {
            Ok(rollback) => rollback_stack.push(rollback),
            Err(err) => {
                for rollback in rollback_stack.into_iter().rev() {
                    rollback(value);
                }
                return Err((err, i));
            }
        };
    }
    Ok(rollback_stack)
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone)]
    enum VecOperation {
        Push(u32),
        Pop(u32), // expects the given value to be popped
    }

    impl Transaction<Vec<u32>> for VecOperation {
        fn execute(&self, vec: &mut Vec<u32>) -> Result<Rollback<Vec<u32>>, TransactionError> {
            match *self {
                VecOperation::Push(value) => {
                    vec.push(value);
                    Ok(Box::new(move |vec| {
                        let result = vec.pop().unwrap();
                        assert!(result == value, "rollback from different state than expected")
                    }))
                }
                VecOperation::Pop(expected) => match vec.last() {
                    Some(&popped) if popped == expected => {
                        vec.pop();
                        Ok(Box::new(move |vec| vec.push(popped)))
                    }
                    _ => Err(TransactionError::NotFound(u64::from(expected))),
                },
            }
        }
    }

    #[test]
    fn batch_applies_in_order() {
        let mut value = vec![1, 2];
        let ops = [VecOperation::Push(3), VecOperation::Pop(3), VecOperation::Push(4)];
        let rollbacks = execute_all_or_roll_back(&mut value, &ops).unwrap();
        assert_eq!(value, vec![1, 2, 4]);
        for rollback in rollbacks.iter().rev() {
            rollback(&mut value);
        }
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn failed_batch_leaves_value_unchanged() {
        let mut value = vec![1, 2];
        let ops = [VecOperation::Push(3), VecOperation::Pop(9)];
        let Err((err, index)) = execute_all_or_roll_back(&mut value, &ops) else {
            panic!("batch should fail");
        };
        assert_eq!(err, TransactionError::NotFound(9));
        assert_eq!(index, 1);
        assert_eq!(value, vec![1, 2]);
    }
}
