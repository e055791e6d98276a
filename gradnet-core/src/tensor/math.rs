// src/tensor/math.rs
//
// Plain CPU kernels. Shape checks here return errors named after the kernel;
// the graph layer validates shapes again with operation-specific messages
// before calling into these.

use crate::error::GradnetError;
use crate::tensor::Tensor;

impl Tensor {
    fn check_same_shape(&self, other: &Tensor, operation: &str) -> Result<(), GradnetError> {
        if self.shape() != other.shape() {
            return Err(GradnetError::ShapeMismatch {
                expected: self.shape_vec(),
                actual: other.shape_vec(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Matrix product `self (m x k) · other (k x n) -> (m x n)`.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, GradnetError> {
        if self.cols != other.rows {
            return Err(GradnetError::ShapeMismatch {
                expected: vec![self.cols, other.cols],
                actual: other.shape_vec(),
                operation: "matmul (inner dim)".to_string(),
            });
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut out = vec![0.0; m * n];
        // i-l-j loop order keeps both inner accesses contiguous.
        for i in 0..m {
            let out_row = &mut out[i * n..(i + 1) * n];
            for l in 0..k {
                let a = self.data[i * k + l];
                if a == 0.0 {
                    continue;
                }
                let b_row = &other.data[l * n..(l + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        Tensor::new(out, m, n)
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Tensor {
        let mut out = vec![0.0; self.data.len()];
        for r in 0..self.rows {
            for c in 0..self.cols {
                out[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        Tensor {
            data: out,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Applies `f` to every entry.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Combines two equally shaped tensors entry by entry.
    pub fn zip_map<F: Fn(f64, f64) -> f64>(
        &self,
        other: &Tensor,
        f: F,
    ) -> Result<Tensor, GradnetError> {
        self.check_same_shape(other, "zip_map")?;
        Ok(Tensor {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn add(&self, other: &Tensor) -> Result<Tensor, GradnetError> {
        self.check_same_shape(other, "add")?;
        self.zip_map(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor, GradnetError> {
        self.check_same_shape(other, "sub")?;
        self.zip_map(other, |a, b| a - b)
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&self, factor: f64) -> Tensor {
        self.map(|x| x * factor)
    }

    /// Adds `other` into `self` in place (gradient accumulation).
    pub fn add_assign(&mut self, other: &Tensor) -> Result<(), GradnetError> {
        self.check_same_shape(other, "add_assign")?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    /// Adds the `1 x n` row vector `bias` to every row of `self`.
    pub fn add_row_vector(&self, bias: &Tensor) -> Result<Tensor, GradnetError> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(GradnetError::ShapeMismatch {
                expected: vec![1, self.cols],
                actual: bias.shape_vec(),
                operation: "add_row_vector".to_string(),
            });
        }
        let mut out = self.data.clone();
        for row in out.chunks_mut(self.cols.max(1)) {
            for (o, &b) in row.iter_mut().zip(&bias.data) {
                *o += b;
            }
        }
        Ok(Tensor {
            data: out,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Column sums, returned as a `1 x cols` row vector.
    pub fn sum_rows(&self) -> Tensor {
        let mut out = vec![0.0; self.cols];
        for row in self.iter_rows() {
            for (o, &x) in out.iter_mut().zip(row) {
                *o += x;
            }
        }
        Tensor {
            data: out,
            rows: 1,
            cols: self.cols,
        }
    }

    /// Sum of all entries.
    pub fn sum_all(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Index of the largest entry of each row (first one on ties).
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.iter_rows()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, &x)| {
                        if x > best {
                            (i, x)
                        } else {
                            (best_i, best)
                        }
                    })
                    .0
            })
            .collect()
    }

    /// Index of the largest entry of one row.
    pub fn argmax_row(&self, row: usize) -> Result<usize, GradnetError> {
        self.row(row)?;
        Ok(self.argmax_rows()[row])
    }

    /// Row-wise log-softmax, computed as `x - max - ln(sum(exp(x - max)))`
    /// so that very large logits stay finite.
    pub fn log_softmax_rows(&self) -> Tensor {
        let mut out = Vec::with_capacity(self.data.len());
        for row in self.iter_rows() {
            let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let log_sum_exp = row.iter().map(|&x| (x - max).exp()).sum::<f64>().ln();
            out.extend(row.iter().map(|&x| x - max - log_sum_exp));
        }
        Tensor {
            data: out,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Row-wise softmax.
    pub fn softmax_rows(&self) -> Tensor {
        self.log_softmax_rows().map(f64::exp)
    }

    /// True if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}
