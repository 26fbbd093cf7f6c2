use std::fs;
use std::path::Path;

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// On-disk form of an N-D array: its shape plus the elements in row-major order.
///
/// ```json
/// {"shape": [1, 2, 3], "data": [0, 1, 2, 3, 4, 5]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayFile<A> {
    pub shape: Vec<usize>,
    pub data: Vec<A>,
}

impl<A: Clone> ArrayFile<A> {
    pub fn from_view(view: &ArrayViewD<'_, A>) -> Self {
        Self {
            shape: view.shape().to_vec(),
            data: view.iter().cloned().collect(),
        }
    }

    pub fn into_array(self) -> Result<ArrayD<A>> {
        let expected: usize = self.shape.iter().product();
        if expected != self.data.len() {
            return Err(Error::config(format!(
                "array file shape {:?} needs {} elements, found {}",
                self.shape,
                expected,
                self.data.len()
            )));
        }
        Ok(ArrayD::from_shape_vec(IxDyn(&self.shape), self.data)?)
    }
}

pub fn read_array<A: DeserializeOwned + Clone>(path: &Path) -> Result<ArrayD<A>> {
    let text = fs::read_to_string(path)?;
    let file: ArrayFile<A> = serde_json::from_str(&text)?;
    let array = file.into_array()?;
    info!("Read array {:?} from {:?}", array.shape(), path);
    Ok(array)
}

pub fn write_array<A: Serialize + Clone>(path: &Path, array: &ArrayD<A>) -> Result<()> {
    let file = ArrayFile::from_view(&array.view());
    fs::write(path, serde_json::to_string(&file)?)?;
    info!("Wrote array {:?} to {:?}", array.shape(), path);
    Ok(())
}

/// Several arrays as one JSON list, e.g. the samples of a multi-crop.
pub fn write_arrays<A: Serialize + Clone>(path: &Path, arrays: &[ArrayD<A>]) -> Result<()> {
    let files: Vec<ArrayFile<A>> = arrays
        .iter()
        .map(|a| ArrayFile::from_view(&a.view()))
        .collect();
    fs::write(path, serde_json::to_string(&files)?)?;
    info!("Wrote {} arrays to {:?}", arrays.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.json");
        let img = array![[[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]]].into_dyn();
        write_array(&path, &img).unwrap();
        let back: ArrayD<f64> = read_array(&path).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn element_count_must_match_shape() {
        let file = ArrayFile {
            shape: vec![1, 2, 2],
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            file.into_array(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"shape\": [2]").unwrap();
        assert!(matches!(read_array::<f64>(&path), Err(Error::Json(_))));
    }
}
