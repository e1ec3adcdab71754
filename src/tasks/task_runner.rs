use tracing::info;

type Task = Box<dyn FnOnce() + Send>;

/// Collects named background tasks and starts them together once wiring is done.
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<(&'static str, Task)>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task<F>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.push((name, Box::new(task)));
    }

    pub fn start_all(self) {
        for (name, task) in self.tasks {
            info!(task = name, "starting background task");
            task();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn starts_every_task_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut runner = TaskRunner::new();
        for name in ["first", "second"] {
            let counter = counter.clone();
            runner.add_task(name, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        runner.start_all();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
