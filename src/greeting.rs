/// Something that can introduce itself.
pub trait Greeter {
    fn hello(&self) -> &'static str;
}

pub struct Go;

impl Greeter for Go {
    fn hello(&self) -> &'static str {
        "hi i'm Go"
    }
}

pub struct Php;

impl Greeter for Php {
    fn hello(&self) -> &'static str {
        "hi i'm PHP"
    }
}

/// Ask any [`Greeter`] for its greeting.
pub fn greet(greeter: &dyn Greeter) -> &'static str {
    greeter.hello()
}
