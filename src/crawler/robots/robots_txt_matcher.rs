#[derive(Clone)]
pub struct RobotsTxtMatcher<'a> {
    matcher: robots_txt::matcher::SimpleMatcher<'a>,
}

impl<'a> RobotsTxtMatcher<'a> {
    pub fn new(matcher: robots_txt::matcher::SimpleMatcher<'a>) -> Self {
        Self { matcher }
    }

    pub fn is_allowed(&self, path: &str) -> bool {
        self.matcher.check_path(path)
    }

    pub fn is_disallowed(&self, path: &str) -> bool {
        !self.is_allowed(path)
    }
}
