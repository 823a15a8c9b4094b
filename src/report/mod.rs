pub mod plot;
pub mod table;

pub use plot::{plot_acc_loss, render_chart};
pub use table::{print_top, render_grid, render_top, Align};
