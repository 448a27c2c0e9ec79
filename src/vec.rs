use std::ops::{
    Add, AddAssign, Deref, DerefMut, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub,
    SubAssign,
};

use crate::error::{Error, Result};

pub type Mat4x4 = Mat<f32, 4, 4>;
pub type Mat3x3 = Mat<f32, 3, 3>;

/// Dense `M x N` matrix stored row by row. Dimensions live in the type, so multiplying
/// incompatible matrices is a compile error rather than a runtime failure.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mat<T, const M: usize, const N: usize>([[T; N]; M]);

impl<T: Num, const M: usize, const N: usize> Mat<T, M, N> {
    pub fn zero() -> Self {
        Mat([[T::zero(); N]; M])
    }

    pub fn one() -> Self {
        Mat([[T::one(); N]; M])
    }

    pub fn rows(&self) -> usize {
        M
    }

    pub fn cols(&self) -> usize {
        N
    }

    pub fn transpose(&self) -> Mat<T, N, M> {
        let mut ret = Mat::zero();
        for i in 0..M {
            for j in 0..N {
                ret[(j, i)] = self[(i, j)];
            }
        }
        ret
    }

    pub fn row(&self, i: usize) -> Vec<T, N> {
        Vec::from(self.0[i])
    }

    pub fn col(&self, j: usize) -> Vec<T, M> {
        Vec::from(self.0.map(|row| row[j]))
    }
}

impl<T: Num, const N: usize> Mat<T, N, N> {
    pub fn identity() -> Self {
        let mut ret = Self::zero();
        for i in 0..N {
            ret[(i, i)] = T::one();
        }
        ret
    }
}

impl<T: Float, const N: usize> Mat<T, N, N> {
    /// Inverts the matrix with Gauss-Jordan elimination. Rows are swapped so the largest
    /// remaining pivot is always used; a pivot smaller than `1e-6` means the matrix is singular.
    pub fn inverse(&self) -> Result<Self> {
        let eps = T::from_f64(1e-6);
        let mut a = self.0;
        let mut inv = Self::identity().0;

        for col in 0..N {
            let mut pivot = col;
            for row in col + 1..N {
                if a[row][col].abs() > a[pivot][col].abs() {
                    pivot = row;
                }
            }
            // `!(x > eps)` also rejects NaN pivots
            if !(a[pivot][col].abs() > eps) {
                return Err(Error::NonInvertibleMatrix);
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let p = a[col][col];
            for j in 0..N {
                a[col][j] /= p;
                inv[col][j] /= p;
            }

            for row in 0..N {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == T::zero() {
                    continue;
                }
                for j in 0..N {
                    let da = factor * a[col][j];
                    let di = factor * inv[col][j];
                    a[row][j] -= da;
                    inv[row][j] -= di;
                }
            }
        }
        Ok(Mat(inv))
    }
}

impl<T: Float> Mat<T, 4, 4> {
    #[rustfmt::skip]
    pub fn rotation_x(theta: T) -> Self {
        let o = T::one();
        let z = T::zero();
        let cos = theta.cos();
        let sin = theta.sin();
        Mat([[   o,   z,   z,   z],
             [   z, cos,-sin,   z],
             [   z, sin, cos,   z],
             [   z,   z,   z,   o]])
    }

    #[rustfmt::skip]
    pub fn rotation_y(theta: T) -> Self {
        let o = T::one();
        let z = T::zero();
        let cos = theta.cos();
        let sin = theta.sin();
        Mat([[ cos,   z, sin,   z],
             [   z,   o,   z,   z],
             [-sin,   z, cos,   z],
             [   z,   z,   z,   o]])
    }

    #[rustfmt::skip]
    pub fn rotation_z(theta: T) -> Self {
        let o = T::one();
        let z = T::zero();
        let cos = theta.cos();
        let sin = theta.sin();
        Mat([[ cos, -sin,   z,   z],
             [ sin,  cos,   z,   z],
             [   z,    z,   o,   z],
             [   z,    z,   z,   o]])
    }
}

impl Default for Mat4x4 {
    fn default() -> Self {
        Mat::identity()
    }
}

impl<T, const M: usize, const N: usize> From<[[T; N]; M]> for Mat<T, M, N> {
    fn from(value: [[T; N]; M]) -> Self {
        Mat(value)
    }
}

pub type Vec<T, const N: usize> = Mat<T, N, 1>;
pub type Vec2 = Vec<f32, 2>;
pub type Vec3 = Vec<f32, 3>;
pub type Vec4 = Vec<f32, 4>;
pub type Vec2i = Vec<i32, 2>;
pub type Vec3i = Vec<i32, 3>;

impl<T: Copy, const N: usize> Vec<T, N> {
    pub fn repeat(value: T) -> Self {
        Mat([[value]; N])
    }

    pub fn to_array(self) -> [T; N] {
        self.0.map(|[coord]| coord)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vec<U, N> {
        Mat(self.0.map(|[coord]| [f(coord)]))
    }
}

impl<T: Num, const N: usize> Vec<T, N> {
    pub fn dot(self, rhs: Self) -> T {
        let mut acc = T::zero();
        for i in 0..N {
            acc += self[(i, 0)] * rhs[(i, 0)];
        }
        acc
    }

    pub fn mag_sq(&self) -> T {
        self.dot(*self)
    }

    pub fn element_mul(self, rhs: Self) -> Self {
        let mut ret = self;
        for i in 0..N {
            ret[(i, 0)] *= rhs[(i, 0)];
        }
        ret
    }

    pub fn min(self, rhs: Self) -> Self {
        let mut ret = self;
        for i in 0..N {
            if rhs[(i, 0)] < ret[(i, 0)] {
                ret[(i, 0)] = rhs[(i, 0)];
            }
        }
        ret
    }

    pub fn max(self, rhs: Self) -> Self {
        let mut ret = self;
        for i in 0..N {
            if rhs[(i, 0)] > ret[(i, 0)] {
                ret[(i, 0)] = rhs[(i, 0)];
            }
        }
        ret
    }
}

impl<T: Float, const N: usize> Vec<T, N> {
    pub fn mag(&self) -> T {
        self.mag_sq().sqrt()
    }

    /// Divides by the magnitude. A zero vector produces NaN components; use
    /// [`Vec::try_normalize`] when the input may be degenerate.
    pub fn normalize(self) -> Self {
        self / self.mag()
    }

    pub fn try_normalize(self) -> Option<Self> {
        let mag = self.mag();
        if mag > T::zero() && mag.is_finite() {
            Some(self / mag)
        } else {
            None
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|&[coord]| coord.is_finite())
    }
}

impl<const N: usize> Vec<f32, N> {
    pub fn floor(self) -> Self {
        self.map(f32::floor)
    }

    pub fn to_i32(self) -> Vec<i32, N> {
        self.map(|coord| coord as i32)
    }
}

impl<const N: usize> Vec<i32, N> {
    pub fn to_f32(self) -> Vec<f32, N> {
        self.map(|coord| coord as f32)
    }
}

impl<T: Num> Vec<T, 2> {
    /// Scalar 2D cross product (`a.x * b.y - a.y * b.x`), twice the signed area spanned by both vectors.
    pub fn perp_dot(self, rhs: Self) -> T {
        self.x * rhs.y - self.y * rhs.x
    }
}

impl<T: Num> Vec<T, 3> {
    pub fn cross(self, rhs: Self) -> Self {
        Self::from([
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        ])
    }

    pub fn to_translation(self) -> Mat<T, 4, 4> {
        let mut ret = Mat::identity();
        ret[(0, 3)] = self.x;
        ret[(1, 3)] = self.y;
        ret[(2, 3)] = self.z;
        ret
    }

    pub fn to_scale(self) -> Mat<T, 4, 4> {
        let mut ret = Mat::zero();
        ret[(0, 0)] = self.x;
        ret[(1, 1)] = self.y;
        ret[(2, 2)] = self.z;
        ret[(3, 3)] = T::one();
        ret
    }
}

impl<T: Float> Vec<T, 3> {
    /// Euler angles in radians, composed as `Rx * Ry * Rz`.
    pub fn to_rotation(self) -> Mat<T, 4, 4> {
        Mat::rotation_x(self.x) * Mat::rotation_y(self.y) * Mat::rotation_z(self.z)
    }
}

impl<T, const N: usize> From<[T; N]> for Vec<T, N> {
    fn from(value: [T; N]) -> Self {
        Mat(value.map(|coord| [coord]))
    }
}

impl<T, const M: usize, const N: usize> Index<(usize, usize)> for Mat<T, M, N> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.0[i][j]
    }
}

impl<T, const M: usize, const N: usize> IndexMut<(usize, usize)> for Mat<T, M, N> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.0[i][j]
    }
}

impl<T: Num, const M: usize, const N: usize> Add for Mat<T, M, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut ret = self;
        ret += rhs;
        ret
    }
}

impl<T: Num, const M: usize, const N: usize> AddAssign for Mat<T, M, N> {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..M {
            for j in 0..N {
                self[(i, j)] += rhs[(i, j)];
            }
        }
    }
}

impl<T: Num, const M: usize, const N: usize> Sub for Mat<T, M, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut ret = self;
        ret -= rhs;
        ret
    }
}

impl<T: Num, const M: usize, const N: usize> SubAssign for Mat<T, M, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..M {
            for j in 0..N {
                self[(i, j)] -= rhs[(i, j)];
            }
        }
    }
}

impl<T: Num, const M: usize, const N: usize> Neg for Mat<T, M, N> {
    type Output = Self;

    fn neg(self) -> Self {
        let mut ret = self;
        for i in 0..M {
            for j in 0..N {
                ret[(i, j)] = -ret[(i, j)];
            }
        }
        ret
    }
}

impl<T: Num, const M: usize, const N: usize> Mul<T> for Mat<T, M, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        let mut ret = self;
        ret *= rhs;
        ret
    }
}

impl<T: Num, const M: usize, const N: usize> MulAssign<T> for Mat<T, M, N> {
    fn mul_assign(&mut self, rhs: T) {
        for i in 0..M {
            for j in 0..N {
                self[(i, j)] *= rhs;
            }
        }
    }
}

macro_rules! impl_mul_lhs {
    ($($ty:ty),+) => {
        $(impl<const M: usize, const N: usize> Mul<Mat<$ty, M, N>> for $ty {
            type Output = Mat<$ty, M, N>;

            fn mul(self, rhs: Mat<$ty, M, N>) -> Mat<$ty, M, N> {
                rhs * self
            }
        })+
    };
}

impl_mul_lhs!(f32, f64, i32);

impl<T: Num, const M: usize, const K: usize, const N: usize> Mul<Mat<T, K, N>> for Mat<T, M, K> {
    type Output = Mat<T, M, N>;

    fn mul(self, rhs: Mat<T, K, N>) -> Self::Output {
        let mut ret = Mat::zero();
        for i in 0..M {
            for j in 0..N {
                for k in 0..K {
                    ret[(i, j)] += self[(i, k)] * rhs[(k, j)];
                }
            }
        }
        ret
    }
}

impl<T: Num, const M: usize, const N: usize> Div<T> for Mat<T, M, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        let mut ret = self;
        ret /= rhs;
        ret
    }
}

impl<T: Num, const M: usize, const N: usize> DivAssign<T> for Mat<T, M, N> {
    fn div_assign(&mut self, rhs: T) {
        for i in 0..M {
            for j in 0..N {
                self[(i, j)] /= rhs;
            }
        }
    }
}

// `Vec<T, N>` is `[[T; 1]; N]`, which has the same layout as `[T; N]` and therefore as the
// `#[repr(C)]` component structs below.

impl<T> Deref for Vec<T, 2> {
    type Target = XY<T>;

    fn deref(&self) -> &XY<T> {
        unsafe { &*(self as *const Self as *const XY<T>) }
    }
}

impl<T> DerefMut for Vec<T, 2> {
    fn deref_mut(&mut self) -> &mut XY<T> {
        unsafe { &mut *(self as *mut Self as *mut XY<T>) }
    }
}

impl<T> Deref for Vec<T, 3> {
    type Target = XYZ<T>;

    fn deref(&self) -> &XYZ<T> {
        unsafe { &*(self as *const Self as *const XYZ<T>) }
    }
}

impl<T> DerefMut for Vec<T, 3> {
    fn deref_mut(&mut self) -> &mut XYZ<T> {
        unsafe { &mut *(self as *mut Self as *mut XYZ<T>) }
    }
}

impl<T> Deref for Vec<T, 4> {
    type Target = XYZW<T>;

    fn deref(&self) -> &XYZW<T> {
        unsafe { &*(self as *const Self as *const XYZW<T>) }
    }
}

impl<T> DerefMut for Vec<T, 4> {
    fn deref_mut(&mut self) -> &mut XYZW<T> {
        unsafe { &mut *(self as *mut Self as *mut XYZW<T>) }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct XY<T> {
    pub x: T,
    pub y: T,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct XYZ<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> XYZ<T> {
    pub fn xy(&self) -> Vec<T, 2> {
        Vec::from([self.x, self.y])
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct XYZW<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

impl<T: Copy> XYZW<T> {
    pub fn xy(&self) -> Vec<T, 2> {
        Vec::from([self.x, self.y])
    }

    pub fn xyz(&self) -> Vec<T, 3> {
        Vec::from([self.x, self.y, self.z])
    }
}

pub trait Num:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
    + Mul<Output = Self>
    + MulAssign
    + Div<Output = Self>
    + DivAssign
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
}

pub trait Float: Num {
    fn from_f64(value: f64) -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;
}

impl Num for i32 {
    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }
}

macro_rules! impl_float {
    ($($ty:ident),+) => {
        $(impl Num for $ty {
            fn zero() -> Self {
                0.0
            }

            fn one() -> Self {
                1.0
            }
        }

        impl Float for $ty {
            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn sqrt(self) -> Self {
                $ty::sqrt(self)
            }

            fn sin(self) -> Self {
                $ty::sin(self)
            }

            fn cos(self) -> Self {
                $ty::cos(self)
            }

            fn abs(self) -> Self {
                $ty::abs(self)
            }

            fn is_finite(self) -> bool {
                $ty::is_finite(self)
            }
        })+
    };
}

impl_float!(f32, f64);
