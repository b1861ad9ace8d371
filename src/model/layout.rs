/// Position and scale of one barcode on the page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodePlacement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// Page geometry for the printed document
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub page_width: u32,
    pub page_height: u32,
    /// Primary artifact, printed large
    pub private_barcode: BarcodePlacement,
    pub public_barcode: BarcodePlacement,
    pub font: String,
    pub font_size: u32,
    pub text_x: f64,
    pub text_top: f64,
    pub line_step: f64,
    /// Characters per public key chunk, in the transcript and the payload source
    pub chunk_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            page_width: 595,
            page_height: 842,
            private_barcode: BarcodePlacement {
                x: 50.0,
                y: 570.0,
                scale: 3.0,
            },
            public_barcode: BarcodePlacement {
                x: 400.0,
                y: 678.0,
                scale: 1.5,
            },
            font: "Courier".to_string(),
            font_size: 8,
            text_x: 50.0,
            text_top: 510.0,
            line_step: 10.0,
            chunk_width: 100,
        }
    }
}

impl Layout {
    /// Vertical position of transcript line `index`
    pub fn line_y(&self, index: usize) -> f64 {
        self.text_top - self.line_step * index as f64
    }
}
