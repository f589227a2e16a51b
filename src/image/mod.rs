use nalgebra::*;
use crate::{Error, Result};
use log::warn;

/// Number of interleaved channels (RGB) per pixel.
pub const CHANNELS : usize = 3;

/// Decoded raster with interleaved 8-bit RGB samples, stored row by row.
/// Decoding and encoding files is left to the caller; this structure only
/// carries the pixels and the operations used to derive features from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {

    width : usize,

    height : usize,

    /// Maximum sample value declared by the source raster.
    depth : u16,

    data : Vec<u8>
}

impl Image {

    /// Black image of the informed size.
    pub fn new(width : usize, height : usize, depth : u16) -> Self {
        Self { width, height, depth, data : vec![0; width * height * CHANNELS] }
    }

    pub fn from_raw(width : usize, height : usize, depth : u16, data : Vec<u8>) -> Result<Self> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(Error::DimensionMismatch { expected, found : data.len() });
        }
        Ok(Self { width, height, depth, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn n_pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }

    pub fn pixels(&self) -> impl Iterator<Item=&[u8]> {
        self.data.chunks(CHANNELS)
    }

    fn check_size(&self, other : &Image) -> Result<()> {
        if self.data.len() != other.data.len() {
            Err(Error::DimensionMismatch { expected : self.data.len(), found : other.data.len() })
        } else {
            Ok(())
        }
    }

    /// Bitwise AND of every sample. Masking an image with a reference where the
    /// region of interest is white and the background black keeps only that region.
    pub fn and(&self, other : &Image) -> Result<Image> {
        self.check_size(other)?;
        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a & b ).collect();
        Ok(Image { data, ..self.clone() })
    }

    /// A pixel is positive when any of its channels is non-zero.
    pub fn truth_mask(&self) -> Vec<bool> {
        self.pixels().map(|px| px.iter().any(|c| *c > 0) ).collect()
    }

    /// Copies the pixels at positive mask positions, leaving the others black.
    pub fn apply_mask(&self, mask : &[bool]) -> Result<Image> {
        if mask.len() != self.n_pixels() {
            return Err(Error::DimensionMismatch { expected : self.n_pixels(), found : mask.len() });
        }
        let mut out = Image::new(self.width, self.height, self.depth);
        for (i, keep) in mask.iter().enumerate() {
            if *keep {
                let px = i * CHANNELS;
                out.data[px..px+CHANNELS].copy_from_slice(&self.data[px..px+CHANNELS]);
            }
        }
        Ok(out)
    }

    /// Normalized rg chromaticity: each pixel becomes the row (r / (r+g+b), g / (r+g+b)).
    /// Black pixels, which carry no chromaticity, become zero rows.
    pub fn chromaticity(&self) -> DMatrix<f64> {
        let mut rg = DMatrix::zeros(self.n_pixels(), 2);
        for (i, px) in self.pixels().enumerate() {
            let sum : f64 = px.iter().map(|c| *c as f64 ).sum();
            if sum > 0.0 {
                rg[(i, 0)] = px[0] as f64 / sum;
                rg[(i, 1)] = px[1] as f64 / sum;
            }
        }
        rg
    }

    /// Chromaticity of the pixels of self kept by the reference mask, without the
    /// rows of masked-out (black) pixels. This is the training sample of a color model.
    pub fn masked_chromaticity(&self, reference : &Image) -> Result<DMatrix<f64>> {
        let masked = self.and(reference)?;
        Ok(trim_zeros(&masked.chromaticity()))
    }

}

/// Removes the rows of m whose entries are all zero, preserving the order of the others.
pub fn trim_zeros(m : &DMatrix<f64>) -> DMatrix<f64> {
    let keep : Vec<usize> = m.row_iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|v| *v != 0.0) )
        .map(|(i, _)| i )
        .collect();
    if keep.is_empty() && m.nrows() > 0 {
        warn!("All {} rows are zero", m.nrows());
    }
    DMatrix::from_fn(keep.len(), m.ncols(), |i, j| m[(keep[i], j)] )
}

#[cfg(test)]
mod tests {

    use super::*;

    const EPS : f64 = 1E-12;

    // 2x2 image: red, gray, black, greenish.
    fn image() -> Image {
        Image::from_raw(2, 2, 255, vec![200, 0, 0, 10, 10, 10, 0, 0, 0, 50, 100, 50]).unwrap()
    }

    fn reference() -> Image {
        Image::from_raw(2, 2, 255, vec![255, 255, 255, 0, 0, 0, 255, 255, 255, 255, 255, 255]).unwrap()
    }

    #[test]
    fn chromaticity() {
        let rg = image().chromaticity();
        assert_eq!(rg.shape(), (4, 2));
        assert!((rg[(0, 0)] - 1.).abs() < EPS && rg[(0, 1)].abs() < EPS);
        assert!((rg[(1, 0)] - 1. / 3.).abs() < EPS && (rg[(1, 1)] - 1. / 3.).abs() < EPS);
        assert!(rg[(2, 0)] == 0. && rg[(2, 1)] == 0.);
        assert!((rg[(3, 0)] - 0.25).abs() < EPS && (rg[(3, 1)] - 0.5).abs() < EPS);
    }

    #[test]
    fn masking() {
        let img = image();
        let masked = img.and(&reference()).unwrap();
        assert_eq!(masked.data(), &[200, 0, 0, 0, 0, 0, 0, 0, 0, 50, 100, 50][..]);
        assert_eq!(reference().truth_mask(), vec![true, false, true, true]);
        let kept = img.apply_mask(&[false, true, false, false]).unwrap();
        assert_eq!(kept.data(), &[0, 0, 0, 10, 10, 10, 0, 0, 0, 0, 0, 0][..]);
        assert!(img.apply_mask(&[true]).unwrap_err().is_precondition());
        assert!(img.and(&Image::new(1, 1, 255)).is_err());
    }

    #[test]
    fn training_sample() {
        let rg = image().masked_chromaticity(&reference()).unwrap();
        assert_eq!(rg.nrows(), 2);
        assert!((rg[(1, 1)] - 0.5).abs() < EPS);
    }

    #[test]
    fn trimming() {
        let m = DMatrix::from_row_slice(4, 2, &[0., 0., 1., 2., 0., 0., 0., 3.]);
        let t = trim_zeros(&m);
        assert_eq!(t, DMatrix::from_row_slice(2, 2, &[1., 2., 0., 3.]));
        assert_eq!(trim_zeros(&DMatrix::zeros(3, 2)).nrows(), 0);
    }

    #[test]
    fn raw_size() {
        assert!(Image::from_raw(2, 2, 255, vec![0; 11]).is_err());
    }

}
