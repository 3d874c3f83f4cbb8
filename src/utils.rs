///! Some utility functions

use crate::task::{Repeat, Task};

/// A debug utility that pretty-prints a task list
pub fn print_task_list(tasks: &[Task]) {
    for task in tasks {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let repeat = match task.repeat() {
        Repeat::None => ".",
        Repeat::Daily => "d",
        Repeat::Weekly => "w",
        Repeat::Custom => "c",
    };
    println!("    {}{} {} {} {}\t{}", completion, repeat, task.date(), task.time().format("%H:%M"), task.name(), task.id());
}
