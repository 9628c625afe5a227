mod axes_draw;
pub mod scatter;
