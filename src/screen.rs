#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The grid rendered before downsampling by `factor` in each direction.
    pub fn super_sampled(&self, factor: u32) -> Size {
        Size {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}
