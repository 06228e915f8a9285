mod robots_txt_matcher;
mod robots_txt_source;
mod robots_txt_view;

pub use robots_txt_matcher::RobotsTxtMatcher;
pub use robots_txt_source::RobotsTxtSource;
pub use robots_txt_view::RobotsTxtView;
